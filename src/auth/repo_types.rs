use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,       // not unique
    pub email: String,          // unique, lower-cased
    pub password_hash: String,  // Argon2 PHC string, never exposed
    pub created_at: OffsetDateTime,
}

/// Everything needed to insert a user; the id is chosen by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
