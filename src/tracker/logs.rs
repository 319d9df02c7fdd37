use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, Time};
use uuid::Uuid;

use crate::records::{RecordQuery, Resource};

/// One day of food logging; meals hang off it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodLog {
    #[serde(with = "crate::tracker::date_format")]
    pub date: Date,
    pub meal_count: Option<i32>,
}

impl Resource for FoodLog {
    const PATH: &'static str = "/food_logs";
    const TABLE: &'static str = "food_logs";
    const LABEL: &'static str = "Food log";
    const COLUMNS: &'static [&'static str] = &["date", "meal_count"];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query.bind(self.date).bind(self.meal_count)
    }
}

/// `food_log_id` must name a food log of the same owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub food_log_id: Uuid,
    pub food_name: Option<String>,
    pub meal_type: Option<String>,
    pub image_url: Option<String>,
}

impl Resource for Meal {
    const PATH: &'static str = "/meals";
    const TABLE: &'static str = "meals";
    const LABEL: &'static str = "Meal";
    const COLUMNS: &'static [&'static str] = &["food_log_id", "food_name", "meal_type", "image_url"];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.food_log_id)
            .bind(self.food_name)
            .bind(self.meal_type)
            .bind(self.image_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExerciseLog {
    #[serde(with = "crate::tracker::date_format")]
    pub date: Date,
    pub activity_type: Option<String>,
    pub duration: Option<i32>, // minutes
    pub calories_burned: Option<f64>,
    pub notes: Option<String>,
}

impl Resource for ExerciseLog {
    const PATH: &'static str = "/exercise_logs";
    const TABLE: &'static str = "exercise_logs";
    const LABEL: &'static str = "Exercise log";
    const COLUMNS: &'static [&'static str] =
        &["date", "activity_type", "duration", "calories_burned", "notes"];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.date)
            .bind(self.activity_type)
            .bind(self.duration)
            .bind(self.calories_burned)
            .bind(self.notes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SleepLog {
    #[serde(with = "crate::tracker::date_format")]
    pub date: Date,
    #[serde(default, with = "crate::tracker::clock_format::option")]
    pub bed_time: Option<Time>,
    #[serde(default, with = "crate::tracker::clock_format::option")]
    pub wake_time: Option<Time>,
    pub sleep_quality: Option<String>,
    pub notes: Option<String>,
}

impl Resource for SleepLog {
    const PATH: &'static str = "/sleep_logs";
    const TABLE: &'static str = "sleep_logs";
    const LABEL: &'static str = "Sleep log";
    const COLUMNS: &'static [&'static str] =
        &["date", "bed_time", "wake_time", "sleep_quality", "notes"];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.date)
            .bind(self.bed_time)
            .bind(self.wake_time)
            .bind(self.sleep_quality)
            .bind(self.notes)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WaterIntakeLog {
    #[serde(with = "crate::tracker::date_format")]
    pub date: Date,
    pub count: Option<i32>, // glasses
}

impl Resource for WaterIntakeLog {
    const PATH: &'static str = "/water_intake_logs";
    const TABLE: &'static str = "water_intake_logs";
    const LABEL: &'static str = "Water intake log";
    const COLUMNS: &'static [&'static str] = &["date", "count"];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query.bind(self.date).bind(self.count)
    }
}
