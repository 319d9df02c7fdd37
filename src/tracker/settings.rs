use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::records::{RecordQuery, Resource};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationSettings {
    pub water_reminder_enabled: Option<bool>,
    pub exercise_reminder_enabled: Option<bool>,
    pub meal_logging_enabled: Option<bool>,
    pub sleep_reminder_enabled: Option<bool>,
}

impl Resource for NotificationSettings {
    const PATH: &'static str = "/notification_settings";
    const TABLE: &'static str = "notification_settings";
    const LABEL: &'static str = "Notification setting";
    const COLUMNS: &'static [&'static str] = &[
        "water_reminder_enabled",
        "exercise_reminder_enabled",
        "meal_logging_enabled",
        "sleep_reminder_enabled",
    ];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.water_reminder_enabled)
            .bind(self.exercise_reminder_enabled)
            .bind(self.meal_logging_enabled)
            .bind(self.sleep_reminder_enabled)
    }
}
