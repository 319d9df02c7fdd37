//! The per-user wellness collections.

use std::sync::Arc;

use time::{Date, Time};

use axum::Router;

use crate::{
    auth::jwt::JwtKeys,
    records::{self, repo::OwnedRepository, Resource},
    state::AppState,
};

mod goals;
mod logs;
mod profile;
mod settings;

pub use goals::{Achievement, UserGoal};
pub use logs::{ExerciseLog, FoodLog, Meal, SleepLog, WaterIntakeLog};
pub use profile::{AboutYourself, BasicProfile, PhysicalInfo};
pub use settings::NotificationSettings;

// Wire formats for calendar values: `2025-03-01` and `22:30:00`.
time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");
time::serde::format_description!(clock_format, Time, "[hour]:[minute]:[second]");

fn scoped<R: Resource>(repo: &Arc<dyn OwnedRepository<R>>, keys: &JwtKeys) -> Router<AppState> {
    records::router(repo.clone(), keys.clone())
}

pub fn router(state: &AppState) -> Router<AppState> {
    let repos = &state.repos;
    let keys = &state.keys;
    Router::new()
        .merge(scoped(&repos.basic_profiles, keys))
        .merge(scoped(&repos.physical_info, keys))
        .merge(scoped(&repos.about_yourself, keys))
        .merge(scoped(&repos.user_goals, keys))
        .merge(scoped(&repos.achievements, keys))
        .merge(scoped(&repos.food_logs, keys))
        .merge(scoped(&repos.meals, keys))
        .merge(scoped(&repos.exercise_logs, keys))
        .merge(scoped(&repos.sleep_logs, keys))
        .merge(scoped(&repos.water_intake_logs, keys))
        .merge(scoped(&repos.notification_settings, keys))
}
