use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo::{FoodFields, FoodItem};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    records::dto::{json_body, record_id, CreateBody, Pagination},
    state::AppState,
};

const PATH: &str = "/nutrition_database";
const LABEL: &str = "Food";

type IdPath = Result<Path<Uuid>, PathRejection>;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(PATH, get(list_foods).post(create_food))
        .route(
            &format!("{PATH}/:id"),
            get(get_food).put(update_food).delete(delete_food),
        )
}

fn validated(mut fields: FoodFields) -> Result<FoodFields, ApiError> {
    let name = fields.food_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("food_name must not be empty".into()));
    }
    fields.food_name = name.to_string();
    Ok(fields)
}

fn store_error(e: crate::db::StoreError) -> ApiError {
    ApiError::from_store(e, LABEL)
}

#[instrument(skip_all)]
pub async fn list_foods(
    State(state): State<AppState>,
    _user: AuthUser,
    page: Pagination,
) -> Result<Json<Vec<FoodItem>>, ApiError> {
    let (limit, offset) = page.window();
    let rows = state
        .repos
        .nutrition
        .list(limit, offset)
        .await
        .map_err(store_error)?;
    Ok(Json(rows))
}

#[instrument(skip_all)]
pub async fn get_food(
    State(state): State<AppState>,
    _user: AuthUser,
    id: IdPath,
) -> Result<Json<FoodItem>, ApiError> {
    let id = record_id(id, LABEL)?;
    state
        .repos
        .nutrition
        .get(id)
        .await
        .map_err(store_error)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(LABEL))
}

#[instrument(skip_all)]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<CreateBody<FoodFields>>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<FoodItem>), ApiError> {
    let body = json_body(body)?;
    let fields = validated(body.data)?;
    let id = body.id.unwrap_or_else(Uuid::new_v4);
    let item = state
        .repos
        .nutrition
        .create(id, fields)
        .await
        .map_err(store_error)?;

    info!(%user_id, %id, food = %item.fields.food_name, "food added to catalogue");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("{PATH}/{id}"))],
        Json(item),
    ))
}

#[instrument(skip_all)]
pub async fn update_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: IdPath,
    fields: Result<Json<FoodFields>, JsonRejection>,
) -> Result<Json<FoodItem>, ApiError> {
    let id = record_id(id, LABEL)?;
    let fields = validated(json_body(fields)?)?;
    let item = state
        .repos
        .nutrition
        .update(id, fields)
        .await
        .map_err(store_error)?
        .ok_or_else(|| ApiError::not_found(LABEL))?;

    info!(%user_id, %id, "food updated");
    Ok(Json(item))
}

#[instrument(skip_all)]
pub async fn delete_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    id: IdPath,
) -> Result<Json<Value>, ApiError> {
    let id = record_id(id, LABEL)?;
    let removed = state
        .repos
        .nutrition
        .delete(id)
        .await
        .map_err(store_error)?;
    if !removed {
        return Err(ApiError::not_found(LABEL));
    }
    info!(%user_id, %id, "food removed from catalogue");
    Ok(Json(json!({ "detail": format!("{LABEL} deleted") })))
}
