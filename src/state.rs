use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::PasswordHasher,
        repo::{PgUserRepository, UserRepository},
        services::AuthService,
    },
    config::AppConfig,
    nutrition::repo::{FoodCatalog, PgFoodCatalog},
    records::{
        repo::{OwnedRepository, PgOwnedRepository},
        Resource,
    },
    tracker::{
        AboutYourself, Achievement, BasicProfile, ExerciseLog, FoodLog, Meal,
        NotificationSettings, PhysicalInfo, SleepLog, UserGoal, WaterIntakeLog,
    },
};

/// One repository per store the API touches.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub basic_profiles: Arc<dyn OwnedRepository<BasicProfile>>,
    pub physical_info: Arc<dyn OwnedRepository<PhysicalInfo>>,
    pub about_yourself: Arc<dyn OwnedRepository<AboutYourself>>,
    pub user_goals: Arc<dyn OwnedRepository<UserGoal>>,
    pub achievements: Arc<dyn OwnedRepository<Achievement>>,
    pub food_logs: Arc<dyn OwnedRepository<FoodLog>>,
    pub meals: Arc<dyn OwnedRepository<Meal>>,
    pub exercise_logs: Arc<dyn OwnedRepository<ExerciseLog>>,
    pub sleep_logs: Arc<dyn OwnedRepository<SleepLog>>,
    pub water_intake_logs: Arc<dyn OwnedRepository<WaterIntakeLog>>,
    pub notification_settings: Arc<dyn OwnedRepository<NotificationSettings>>,
    pub nutrition: Arc<dyn FoodCatalog>,
}

fn pg<R: Resource>(db: &PgPool) -> Arc<dyn OwnedRepository<R>> {
    Arc::new(PgOwnedRepository::<R>::new(db.clone()))
}

impl Repositories {
    pub fn postgres(db: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(db.clone())),
            basic_profiles: pg(&db),
            physical_info: pg(&db),
            about_yourself: pg(&db),
            user_goals: pg(&db),
            achievements: pg(&db),
            food_logs: pg(&db),
            meals: pg(&db),
            exercise_logs: pg(&db),
            sleep_logs: pg(&db),
            water_intake_logs: pg(&db),
            notification_settings: pg(&db),
            nutrition: Arc::new(PgFoodCatalog::new(db)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub keys: JwtKeys,
    pub auth: Arc<AuthService>,
    pub repos: Repositories,
}

impl AppState {
    pub fn new(config: &AppConfig, repos: Repositories) -> anyhow::Result<Self> {
        let keys = JwtKeys::new(&config.jwt);
        let hasher = PasswordHasher::new(&config.password)?;
        let auth = Arc::new(AuthService::new(
            repos.users.clone(),
            hasher,
            keys.clone(),
        )?);
        Ok(Self {
            keys,
            auth,
            repos,
        })
    }

    /// State backed by in-memory stores, for router tests.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::{
            auth::{jwt::tests::test_config, password::tests::cheap_config},
            config::DatabaseConfig,
        };

        let config = AppConfig {
            database: DatabaseConfig {
                url: "postgres://unused".into(),
                max_connections: 1,
                acquire_timeout_secs: 1,
            },
            jwt: test_config("test-secret"),
            password: cheap_config(),
            host: "127.0.0.1".into(),
            port: 0,
        };
        Self::new(&config, crate::memory::repositories()).expect("fake state")
    }
}
