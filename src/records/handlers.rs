use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderName, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{json_body, record_id, CreateBody, Pagination},
    Record, RecordState, Resource,
};
use crate::{auth::extractors::AuthUser, error::ApiError};

type Created<R> = (StatusCode, [(HeaderName, String); 1], Json<Record<R>>);
type IdPath = Result<Path<Uuid>, PathRejection>;
type Body<T> = Result<Json<T>, JsonRejection>;

#[instrument(skip_all, fields(resource = R::PATH))]
pub async fn list<R: Resource>(
    State(state): State<RecordState<R>>,
    AuthUser(user_id): AuthUser,
    page: Pagination,
) -> Result<Json<Vec<Record<R>>>, ApiError> {
    let (limit, offset) = page.window();
    let rows = state
        .repo
        .list(user_id, limit, offset)
        .await
        .map_err(|e| ApiError::from_store(e, R::LABEL))?;
    Ok(Json(rows))
}

#[instrument(skip_all, fields(resource = R::PATH))]
pub async fn fetch<R: Resource>(
    State(state): State<RecordState<R>>,
    AuthUser(user_id): AuthUser,
    id: IdPath,
) -> Result<Json<Record<R>>, ApiError> {
    let id = record_id(id, R::LABEL)?;
    state
        .repo
        .get(user_id, id)
        .await
        .map_err(|e| ApiError::from_store(e, R::LABEL))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(R::LABEL))
}

#[instrument(skip_all, fields(resource = R::PATH))]
pub async fn create<R: Resource>(
    State(state): State<RecordState<R>>,
    AuthUser(user_id): AuthUser,
    body: Body<CreateBody<R>>,
) -> Result<Created<R>, ApiError> {
    let body = json_body(body)?;
    let id = body.id.unwrap_or_else(Uuid::new_v4);
    let record = state
        .repo
        .create(user_id, id, body.data)
        .await
        .map_err(|e| ApiError::from_store(e, R::LABEL))?;

    info!(%user_id, %id, "record created");
    let location = format!("{}/{}", R::PATH, record.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}

#[instrument(skip_all, fields(resource = R::PATH))]
pub async fn update<R: Resource>(
    State(state): State<RecordState<R>>,
    AuthUser(user_id): AuthUser,
    id: IdPath,
    data: Body<R>,
) -> Result<Json<Record<R>>, ApiError> {
    let id = record_id(id, R::LABEL)?;
    let data = json_body(data)?;
    let record = state
        .repo
        .update(user_id, id, data)
        .await
        .map_err(|e| ApiError::from_store(e, R::LABEL))?
        .ok_or_else(|| ApiError::not_found(R::LABEL))?;

    info!(%user_id, %id, "record updated");
    Ok(Json(record))
}

#[instrument(skip_all, fields(resource = R::PATH))]
pub async fn remove<R: Resource>(
    State(state): State<RecordState<R>>,
    AuthUser(user_id): AuthUser,
    id: IdPath,
) -> Result<Json<Value>, ApiError> {
    let id = record_id(id, R::LABEL)?;
    let removed = state
        .repo
        .delete(user_id, id)
        .await
        .map_err(|e| ApiError::from_store(e, R::LABEL))?;
    if !removed {
        return Err(ApiError::not_found(R::LABEL));
    }

    info!(%user_id, %id, "record deleted");
    Ok(Json(json!({ "detail": format!("{} deleted", R::LABEL) })))
}
