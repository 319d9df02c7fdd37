use std::sync::Arc;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::RegisterRequest,
        jwt::JwtKeys,
        password::PasswordHasher,
        repo::UserRepository,
        repo_types::{NewUser, User},
    },
    db::StoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AlreadyExists => Self::DuplicateEmail,
            other => Self::Store(other),
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Registration, login and token verification over an injected credential store.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    keys: JwtKeys,
    // Verified against on unknown emails so both login failures cost one Argon2 run.
    dummy_hash: String,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        keys: JwtKeys,
    ) -> anyhow::Result<Self> {
        let dummy_hash = hasher
            .hash("wellness-api-unknown-user")
            .context("build dummy password hash")?;
        Ok(Self {
            users,
            hasher,
            keys,
            dummy_hash,
        })
    }

    /// Creates the account and returns an access token for it.
    pub async fn register(&self, req: RegisterRequest) -> Result<String, AuthError> {
        let email = normalize_email(&req.email);
        let username = req.username.trim().to_string();

        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AuthError::InvalidInput("Invalid email".into()));
        }
        if username.is_empty() {
            return Err(AuthError::InvalidInput("Username is required".into()));
        }
        if req.password.is_empty() {
            return Err(AuthError::InvalidInput("Password is required".into()));
        }

        // Fast path; the unique constraint still decides under concurrent registrations.
        if self.users.find_by_email(&email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hash(req.password).await?;
        let user = self
            .users
            .create(NewUser {
                id: Uuid::new_v4(),
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(self.keys.sign(user.id, &user.email)?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        let user = self.users.find_by_email(&email).await?;
        let hash = user
            .as_ref()
            .map_or_else(|| self.dummy_hash.clone(), |u| u.password_hash.clone());
        let matches = self.verify(password.to_string(), hash).await?;

        let user = match user {
            Some(user) if matches => user,
            Some(user) => {
                warn!(%email, user_id = %user.id, "login invalid password");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                warn!(%email, "login unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        info!(user_id = %user.id, "user logged in");
        Ok(self.keys.sign(user.id, &user.email)?)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_by_id(user_id).await?)
    }

    async fn hash(&self, password: String) -> anyhow::Result<String> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .context("password hashing task")?
    }

    async fn verify(&self, password: String, hash: String) -> anyhow::Result<bool> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .context("password verification task")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{jwt::tests::test_config, password::tests::cheap_config},
        memory::MemoryUserRepository,
    };

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryUserRepository::default()),
            PasswordHasher::new(&cheap_config()).unwrap(),
            JwtKeys::new(&test_config("service-secret")),
        )
        .unwrap()
    }

    fn register_req(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@x.com"));
    }

    #[tokio::test]
    async fn distinct_emails_register_and_duplicates_fail() {
        let auth = service();
        auth.register(register_req("a", "a@x.com", "pw")).await.expect("first");
        auth.register(register_req("b", "b@x.com", "pw")).await.expect("second");

        let err = auth
            .register(register_req("c", "a@x.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn usernames_may_repeat() {
        let auth = service();
        auth.register(register_req("same", "one@x.com", "pw")).await.unwrap();
        auth.register(register_req("same", "two@x.com", "pw")).await.unwrap();
    }

    #[tokio::test]
    async fn email_is_normalized_before_uniqueness_check() {
        let auth = service();
        auth.register(register_req("a", "A@X.com", "pw")).await.unwrap();
        let err = auth
            .register(register_req("a", "  a@x.COM ", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        auth.login("a@x.com", "pw").await.expect("login with lower-case email");
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let auth = service();
        for req in [
            register_req("a", "not-an-email", "pw"),
            register_req("  ", "a@x.com", "pw"),
            register_req("a", "a@x.com", ""),
        ] {
            let err = auth.register(req).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn register_token_identifies_the_new_user() {
        let auth = service();
        let token = auth.register(register_req("a", "a@x.com", "pw")).await.unwrap();
        let user_id = auth.keys.identify(&token).unwrap();

        let user = auth.current_user(user_id).await.unwrap().expect("user exists");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.username, "a");
        assert_ne!(user.password_hash, "pw");
    }

    #[tokio::test]
    async fn login_checks_password() {
        let auth = service();
        let reg = auth.register(register_req("a", "a@x.com", "pw")).await.unwrap();

        let token = auth.login("a@x.com", "pw").await.expect("login");
        assert_eq!(
            auth.keys.identify(&token).unwrap(),
            auth.keys.identify(&reg).unwrap()
        );

        let wrong = auth.login("a@x.com", "PW").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));

        let unknown = auth.login("nobody@x.com", "pw").await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn tokens_from_other_services_are_rejected() {
        let auth = service();
        let foreign = JwtKeys::new(&test_config("not-our-secret"))
            .sign(Uuid::new_v4(), "a@x.com")
            .unwrap();
        assert!(matches!(
            auth.keys.identify(&foreign),
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn unknown_email_still_pays_for_a_hash_check() {
        let auth = service();
        // Same algorithm and cost as real hashes, so the failure paths take equal work.
        assert!(auth.dummy_hash.starts_with("$argon2id$"));
        assert!(auth.dummy_hash.contains("m=8,t=1,p=1"));
        assert!(!auth
            .verify("pw".into(), auth.dummy_hash.clone())
            .await
            .unwrap());

        let err = auth.login("ghost@x.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
