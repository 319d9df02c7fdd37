use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequestParts, Path, Query,
    },
    http::request::Parts,
    Json,
};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;

const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// `(limit, offset)` clamped to what the store accepts.
    pub fn window(&self) -> (i64, i64) {
        (self.limit.clamp(1, MAX_LIMIT), self.offset.max(0))
    }
}

/// Query-string pagination; a malformed query is a `{"detail"}` 400.
#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(page) = Query::<Pagination>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(page)
    }
}

/// An id segment that is not a UUID names no record of `label`.
pub fn record_id(path: Result<Path<Uuid>, PathRejection>, label: &str) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        debug!(error = %e, "unparseable record id");
        ApiError::not_found(label)
    })
}

pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

/// POST body: the resource fields plus an optional client-chosen id.
/// Any `user_id` sent by the client is ignored.
#[derive(Debug, Deserialize)]
pub struct CreateBody<T> {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub data: T,
}
