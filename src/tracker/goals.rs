use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::records::{RecordQuery, Resource};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserGoal {
    pub goal_type: Option<String>,
    pub goal_value: Option<f64>,
    pub goal_current: Option<f64>,
    #[serde(default, with = "crate::tracker::date_format::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "crate::tracker::date_format::option")]
    pub end_date: Option<Date>,
    pub is_active: Option<bool>,
}

impl Resource for UserGoal {
    const PATH: &'static str = "/user_goals";
    const TABLE: &'static str = "user_goals";
    const LABEL: &'static str = "Goal";
    const COLUMNS: &'static [&'static str] = &[
        "goal_type",
        "goal_value",
        "goal_current",
        "start_date",
        "end_date",
        "is_active",
    ];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.goal_type)
            .bind(self.goal_value)
            .bind(self.goal_current)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.is_active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Achievement {
    #[serde(rename = "type")]
    pub achievement_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<i32>,
    pub current: Option<i32>,
    pub achieved: Option<bool>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub achieved_at: Option<OffsetDateTime>,
}

impl Resource for Achievement {
    const PATH: &'static str = "/achievements";
    const TABLE: &'static str = "achievements";
    const LABEL: &'static str = "Achievement";
    const COLUMNS: &'static [&'static str] = &[
        "achievement_type",
        "name",
        "description",
        "target",
        "current",
        "achieved",
        "achieved_at",
    ];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.achievement_type)
            .bind(self.name)
            .bind(self.description)
            .bind(self.target)
            .bind(self.current)
            .bind(self.achieved)
            .bind(self.achieved_at)
    }
}
