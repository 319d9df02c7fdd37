//! In-process stores used by the test suite in place of PostgreSQL.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserRepository,
        repo_types::{NewUser, User},
    },
    db::StoreError,
    nutrition::repo::{FoodCatalog, FoodFields, FoodItem},
    records::{repo::OwnedRepository, Record, Resource},
    state::Repositories,
    tracker::{FoodLog, Meal},
};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) || users.contains_key(&user.id) {
            return Err(StoreError::AlreadyExists);
        }
        let user = User {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

pub type Rows<R> = Arc<RwLock<HashMap<Uuid, Record<R>>>>;
type ReferenceCheck<R> = Box<dyn Fn(Uuid, &R) -> bool + Send + Sync>;
type Cascade = Box<dyn Fn(Uuid) + Send + Sync>;

/// Ids are unique across owners, as with a primary key.
pub struct MemoryOwnedRepository<R> {
    rows: Rows<R>,
    references: Option<ReferenceCheck<R>>,
    cascade: Option<Cascade>,
}

impl<R> Default for MemoryOwnedRepository<R> {
    fn default() -> Self {
        Self {
            rows: Arc::default(),
            references: None,
            cascade: None,
        }
    }
}

impl<R: Resource> MemoryOwnedRepository<R> {
    /// A repository over rows that another store may also look at.
    pub fn with_rows(rows: Rows<R>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Rejects writes whose data fails `check(owner, data)` with `MissingReference`.
    pub fn references(mut self, check: impl Fn(Uuid, &R) -> bool + Send + Sync + 'static) -> Self {
        self.references = Some(Box::new(check));
        self
    }

    /// Runs `purge(id)` after a row is deleted, like `ON DELETE CASCADE`.
    pub fn on_delete(mut self, purge: impl Fn(Uuid) + Send + Sync + 'static) -> Self {
        self.cascade = Some(Box::new(purge));
        self
    }

    fn resolves(&self, owner: Uuid, data: &R) -> Result<(), StoreError> {
        match &self.references {
            Some(check) if !check(owner, data) => Err(StoreError::MissingReference),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R: Resource> OwnedRepository<R> for MemoryOwnedRepository<R> {
    async fn list(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Record<R>>, StoreError> {
        let rows = self.rows.read().unwrap();
        let mut mine: Vec<Record<R>> = rows
            .values()
            .filter(|r| r.user_id == owner)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(mine
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Record<R>>, StoreError> {
        let rows = self.rows.read().unwrap();
        Ok(rows.get(&id).filter(|r| r.user_id == owner).cloned())
    }

    async fn create(&self, owner: Uuid, id: Uuid, data: R) -> Result<Record<R>, StoreError> {
        self.resolves(owner, &data)?;
        let mut rows = self.rows.write().unwrap();
        if rows.contains_key(&id) {
            return Err(StoreError::AlreadyExists);
        }
        // Strictly increasing, so newest-first never ties.
        let now = match rows.values().map(|r| r.created_at).max() {
            Some(latest) if latest >= OffsetDateTime::now_utc() => latest + Duration::nanoseconds(1),
            _ => OffsetDateTime::now_utc(),
        };
        let record = Record {
            id,
            user_id: owner,
            data,
            created_at: now,
            updated_at: now,
        };
        rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        data: R,
    ) -> Result<Option<Record<R>>, StoreError> {
        let mut rows = self.rows.write().unwrap();
        let Some(record) = rows.get_mut(&id).filter(|r| r.user_id == owner) else {
            return Ok(None);
        };
        self.resolves(owner, &data)?;
        record.data = data;
        record.updated_at = OffsetDateTime::now_utc();
        Ok(Some(record.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let removed = {
            let mut rows = self.rows.write().unwrap();
            match rows.get(&id) {
                Some(r) if r.user_id == owner => rows.remove(&id).is_some(),
                _ => false,
            }
        };
        if removed {
            if let Some(purge) = &self.cascade {
                purge(id);
            }
        }
        Ok(removed)
    }
}

#[derive(Default)]
pub struct MemoryFoodCatalog {
    foods: RwLock<HashMap<Uuid, FoodItem>>,
}

#[async_trait]
impl FoodCatalog for MemoryFoodCatalog {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FoodItem>, StoreError> {
        let foods = self.foods.read().unwrap();
        let mut all: Vec<FoodItem> = foods.values().cloned().collect();
        all.sort_by(|a, b| {
            a.fields
                .food_name
                .cmp(&b.fields.food_name)
                .then(a.id.cmp(&b.id))
        });
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<FoodItem>, StoreError> {
        Ok(self.foods.read().unwrap().get(&id).cloned())
    }

    async fn create(&self, id: Uuid, fields: FoodFields) -> Result<FoodItem, StoreError> {
        let mut foods = self.foods.write().unwrap();
        if foods.contains_key(&id) {
            return Err(StoreError::AlreadyExists);
        }
        let now = OffsetDateTime::now_utc();
        let item = FoodItem {
            id,
            fields,
            created_at: now,
            updated_at: now,
        };
        foods.insert(id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, fields: FoodFields) -> Result<Option<FoodItem>, StoreError> {
        let mut foods = self.foods.write().unwrap();
        Ok(foods.get_mut(&id).map(|item| {
            item.fields = fields;
            item.updated_at = OffsetDateTime::now_utc();
            item.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.foods.write().unwrap().remove(&id).is_some())
    }
}

fn owned<R: Resource>() -> Arc<dyn OwnedRepository<R>> {
    Arc::new(MemoryOwnedRepository::<R>::default())
}

/// Every store in memory. Meals must point at a food log of the same owner
/// and go away with it, as the composite foreign key does in PostgreSQL.
pub fn repositories() -> Repositories {
    let log_rows: Rows<FoodLog> = Arc::default();
    let meal_rows: Rows<Meal> = Arc::default();

    let logs = log_rows.clone();
    let meals = MemoryOwnedRepository::<Meal>::with_rows(meal_rows.clone()).references(
        move |owner, meal: &Meal| {
            logs.read()
                .unwrap()
                .get(&meal.food_log_id)
                .is_some_and(|log| log.user_id == owner)
        },
    );
    let food_logs = MemoryOwnedRepository::<FoodLog>::with_rows(log_rows).on_delete(move |log_id| {
        meal_rows
            .write()
            .unwrap()
            .retain(|_, meal| meal.data.food_log_id != log_id);
    });

    Repositories {
        users: Arc::new(MemoryUserRepository::default()),
        basic_profiles: owned(),
        physical_info: owned(),
        about_yourself: owned(),
        user_goals: owned(),
        achievements: owned(),
        food_logs: Arc::new(food_logs),
        meals: Arc::new(meals),
        exercise_logs: owned(),
        sleep_logs: owned(),
        water_intake_logs: owned(),
        notification_settings: owned(),
        nutrition: Arc::new(MemoryFoodCatalog::default()),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[tokio::test]
    async fn rows_are_invisible_to_other_owners() {
        let repo = MemoryOwnedRepository::<FoodLog>::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let log = FoodLog {
            date: date!(2025 - 03 - 01),
            meal_count: Some(2),
        };
        let id = Uuid::new_v4();
        repo.create(a, id, log.clone()).await.unwrap();

        assert!(repo.get(b, id).await.unwrap().is_none());
        assert!(repo.list(b, 20, 0).await.unwrap().is_empty());
        assert!(repo.update(b, id, log.clone()).await.unwrap().is_none());
        assert!(!repo.delete(b, id).await.unwrap());
        assert!(matches!(
            repo.create(b, id, log).await,
            Err(StoreError::AlreadyExists)
        ));
        assert!(repo.delete(a, id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_food_log_removes_its_meals() {
        let repos = repositories();
        let owner = Uuid::new_v4();
        let log_id = Uuid::new_v4();
        let log = FoodLog {
            date: date!(2025 - 03 - 01),
            meal_count: None,
        };
        repos.food_logs.create(owner, log_id, log).await.unwrap();

        let meal = Meal {
            food_log_id: log_id,
            food_name: Some("Soup".into()),
            meal_type: None,
            image_url: None,
        };
        let meal_id = Uuid::new_v4();
        repos.meals.create(owner, meal_id, meal.clone()).await.unwrap();

        assert!(repos.food_logs.delete(owner, log_id).await.unwrap());
        assert!(repos.meals.get(owner, meal_id).await.unwrap().is_none());
        assert!(matches!(
            repos.meals.create(owner, Uuid::new_v4(), meal).await,
            Err(StoreError::MissingReference)
        ));
    }
}
