use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::StoreError;

/// Nutrient values per serving. Client-supplied part of a catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodFields {
    pub food_name: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodItem {
    pub id: Uuid,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: FoodFields,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The shared food catalogue. Entries have no owner.
#[async_trait]
pub trait FoodCatalog: Send + Sync + 'static {
    /// Ordered by name.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FoodItem>, StoreError>;
    async fn get(&self, id: Uuid) -> Result<Option<FoodItem>, StoreError>;
    async fn create(&self, id: Uuid, fields: FoodFields) -> Result<FoodItem, StoreError>;
    async fn update(&self, id: Uuid, fields: FoodFields) -> Result<Option<FoodItem>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

pub struct PgFoodCatalog {
    db: PgPool,
}

impl PgFoodCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodCatalog for PgFoodCatalog {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<FoodItem>, StoreError> {
        let rows = sqlx::query_as::<_, FoodItem>(
            r#"
            SELECT * FROM nutrition_foods
            ORDER BY food_name, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> Result<Option<FoodItem>, StoreError> {
        let row = sqlx::query_as::<_, FoodItem>("SELECT * FROM nutrition_foods WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row)
    }

    async fn create(&self, id: Uuid, fields: FoodFields) -> Result<FoodItem, StoreError> {
        let now = OffsetDateTime::now_utc();
        sqlx::query_as::<_, FoodItem>(
            r#"
            INSERT INTO nutrition_foods
                (id, food_name, calories, protein, carbs, fat, fiber, sugar, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.food_name)
        .bind(fields.calories)
        .bind(fields.protein)
        .bind(fields.carbs)
        .bind(fields.fat)
        .bind(fields.fiber)
        .bind(fields.sugar)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::classify)
    }

    async fn update(&self, id: Uuid, fields: FoodFields) -> Result<Option<FoodItem>, StoreError> {
        let row = sqlx::query_as::<_, FoodItem>(
            r#"
            UPDATE nutrition_foods
            SET food_name = $2, calories = $3, protein = $4, carbs = $5,
                fat = $6, fiber = $7, sugar = $8, updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.food_name)
        .bind(fields.calories)
        .bind(fields.protein)
        .bind(fields.carbs)
        .bind(fields.fat)
        .bind(fields.fiber)
        .bind(fields.sugar)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let done = sqlx::query("DELETE FROM nutrition_foods WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(done.rows_affected() > 0)
    }
}
