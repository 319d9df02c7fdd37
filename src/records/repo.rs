use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Record, Resource};
use crate::db::StoreError;

/// CRUD over one collection, every call scoped by the owner's user id.
/// A row owned by someone else behaves exactly like a missing row.
#[async_trait]
pub trait OwnedRepository<R: Resource>: Send + Sync + 'static {
    /// Newest first.
    async fn list(&self, owner: Uuid, limit: i64, offset: i64)
        -> Result<Vec<Record<R>>, StoreError>;

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Record<R>>, StoreError>;

    /// Fails with `AlreadyExists` if `id` is taken.
    async fn create(&self, owner: Uuid, id: Uuid, data: R) -> Result<Record<R>, StoreError>;

    /// Replaces every resource field; `None` when the owner has no such row.
    async fn update(&self, owner: Uuid, id: Uuid, data: R)
        -> Result<Option<Record<R>>, StoreError>;

    /// `true` if a row was removed.
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

pub struct PgOwnedRepository<R> {
    db: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> PgOwnedRepository<R> {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            _resource: PhantomData,
        }
    }
}

fn select_one_sql(table: &str) -> String {
    format!("SELECT * FROM {table} WHERE id = $1 AND user_id = $2")
}

fn list_sql(table: &str) -> String {
    format!(
        "SELECT * FROM {table} WHERE user_id = $1 \
         ORDER BY created_at DESC, id LIMIT $2 OFFSET $3"
    )
}

// $1 id, $2 user_id, $3 created_at, $4 updated_at, then the data columns.
fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (0..columns.len()).map(|i| format!("${}", i + 5)).collect();
    format!(
        "INSERT INTO {table} (id, user_id, created_at, updated_at, {}) \
         VALUES ($1, $2, $3, $4, {}) RETURNING *",
        columns.join(", "),
        placeholders.join(", ")
    )
}

// $1 id, $2 user_id, $3 updated_at, then the data columns.
fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c} = ${}", i + 4))
        .collect();
    format!(
        "UPDATE {table} SET {}, updated_at = $3 \
         WHERE id = $1 AND user_id = $2 RETURNING *",
        assignments.join(", ")
    )
}

fn delete_sql(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = $1 AND user_id = $2")
}

#[async_trait]
impl<R: Resource> OwnedRepository<R> for PgOwnedRepository<R> {
    async fn list(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Record<R>>, StoreError> {
        let sql = list_sql(R::TABLE);
        let rows = sqlx::query_as::<_, Record<R>>(&sql)
            .bind(owner)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Option<Record<R>>, StoreError> {
        let sql = select_one_sql(R::TABLE);
        let row = sqlx::query_as::<_, Record<R>>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn create(&self, owner: Uuid, id: Uuid, data: R) -> Result<Record<R>, StoreError> {
        let now = OffsetDateTime::now_utc();
        let sql = insert_sql(R::TABLE, R::COLUMNS);
        let query = sqlx::query_as::<_, Record<R>>(&sql)
            .bind(id)
            .bind(owner)
            .bind(now)
            .bind(now);
        data.bind(query)
            .fetch_one(&self.db)
            .await
            .map_err(StoreError::classify)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        data: R,
    ) -> Result<Option<Record<R>>, StoreError> {
        let sql = update_sql(R::TABLE, R::COLUMNS);
        let query = sqlx::query_as::<_, Record<R>>(&sql)
            .bind(id)
            .bind(owner)
            .bind(OffsetDateTime::now_utc());
        data.bind(query)
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::classify)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let sql = delete_sql(R::TABLE);
        let done = sqlx::query(&sql)
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_numbers_data_columns_after_metadata() {
        assert_eq!(
            insert_sql("water_intake_logs", &["date", "count"]),
            "INSERT INTO water_intake_logs (id, user_id, created_at, updated_at, date, count) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        );
    }

    #[test]
    fn update_is_scoped_to_owner() {
        assert_eq!(
            update_sql("sleep_logs", &["date", "notes"]),
            "UPDATE sleep_logs SET date = $4, notes = $5, updated_at = $3 \
             WHERE id = $1 AND user_id = $2 RETURNING *"
        );
    }

    #[test]
    fn reads_and_deletes_filter_by_owner() {
        assert!(select_one_sql("meals").ends_with("WHERE id = $1 AND user_id = $2"));
        assert!(delete_sql("meals").ends_with("WHERE id = $1 AND user_id = $2"));
        assert!(list_sql("meals").contains("WHERE user_id = $1"));
        assert!(list_sql("meals").contains("ORDER BY created_at DESC"));
    }
}
