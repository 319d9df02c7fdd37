//! Owner-scoped CRUD shared by every tracker collection.
//!
//! A collection only describes its table and columns through [`Resource`];
//! routing, ownership checks and SQL are generic.

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::get,
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres, Row,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;

pub mod dto;
pub mod handlers;
pub mod repo;

use repo::OwnedRepository;

pub type RecordQuery<'q, R> = QueryAs<'q, Postgres, Record<R>, PgArguments>;

/// A collection of user-owned rows.
pub trait Resource:
    Clone + Serialize + DeserializeOwned + for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static
{
    /// URL prefix, e.g. `/sleep_logs`.
    const PATH: &'static str;
    const TABLE: &'static str;
    /// Name used in client-facing messages.
    const LABEL: &'static str;
    /// Data columns, in the order [`Resource::bind`] binds them.
    const COLUMNS: &'static [&'static str];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self>;
}

/// A stored row: ownership and timestamps around the resource fields.
#[derive(Debug, Clone, Serialize)]
pub struct Record<T> {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub data: T,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl<'r, T> FromRow<'r, PgRow> for Record<T>
where
    T: FromRow<'r, PgRow>,
{
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            data: T::from_row(row)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

pub struct RecordState<R: Resource> {
    pub repo: Arc<dyn OwnedRepository<R>>,
    pub keys: JwtKeys,
}

impl<R: Resource> Clone for RecordState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<R: Resource> FromRef<RecordState<R>> for JwtKeys {
    fn from_ref(state: &RecordState<R>) -> Self {
        state.keys.clone()
    }
}

/// The five CRUD routes for `R`, mounted at `R::PATH`.
pub fn router<R, S>(repo: Arc<dyn OwnedRepository<R>>, keys: JwtKeys) -> Router<S>
where
    R: Resource,
    S: Clone + Send + Sync + 'static,
{
    let item = format!("{}/:id", R::PATH);
    Router::new()
        .route(
            R::PATH,
            get(handlers::list::<R>).post(handlers::create::<R>),
        )
        .route(
            &item,
            get(handlers::fetch::<R>)
                .put(handlers::update::<R>)
                .delete(handlers::remove::<R>),
        )
        .with_state(RecordState { repo, keys })
}
