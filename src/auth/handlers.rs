use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{PublicUser, RegisterRequest, TokenResponse},
        extractors::{AuthUser, LoginPayload},
    },
    error::ApiError,
    records::dto::json_body,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth.register(json_body(payload)?).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    LoginPayload(payload): LoginPayload,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth.login(&payload.username, &payload.password).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    match state.auth.current_user(user_id).await? {
        Some(user) => Ok(Json(user.into())),
        None => {
            warn!(%user_id, "token for unknown user");
            Err(ApiError::Unauthorized("User not found".into()))
        }
    }
}

#[cfg(test)]
mod me_tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn public_user_never_serializes_the_hash() {
        let user = crate::auth::repo_types::User {
            id: uuid::Uuid::new_v4(),
            username: "a".into(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            created_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_string(&PublicUser::from(user)).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"id\""));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn token_response_is_bearer() {
        let json = serde_json::to_value(TokenResponse::bearer("t".into())).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["access_token"], "t");
    }
}
