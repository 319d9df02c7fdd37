use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::records::{RecordQuery, Resource};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BasicProfile {
    pub full_name: Option<String>,
    #[serde(default, with = "crate::tracker::date_format::option")]
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub profile_image_url: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl Resource for BasicProfile {
    const PATH: &'static str = "/basic_profile";
    const TABLE: &'static str = "basic_profiles";
    const LABEL: &'static str = "Profile";
    const COLUMNS: &'static [&'static str] = &[
        "full_name",
        "date_of_birth",
        "gender",
        "profile_image_url",
        "phone_number",
        "address",
    ];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.full_name)
            .bind(self.date_of_birth)
            .bind(self.gender)
            .bind(self.profile_image_url)
            .bind(self.phone_number)
            .bind(self.address)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PhysicalInfo {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
}

impl Resource for PhysicalInfo {
    const PATH: &'static str = "/physical_info";
    const TABLE: &'static str = "physical_info";
    const LABEL: &'static str = "Physical info";
    const COLUMNS: &'static [&'static str] = &["weight", "height", "activity_level"];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query
            .bind(self.weight)
            .bind(self.height)
            .bind(self.activity_level)
    }
}

/// Free-text self description collected during onboarding.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AboutYourself {
    pub health_description: Option<String>,
    pub health_goal: Option<String>,
}

impl Resource for AboutYourself {
    const PATH: &'static str = "/about_yourself";
    const TABLE: &'static str = "about_yourself";
    const LABEL: &'static str = "About yourself";
    const COLUMNS: &'static [&'static str] = &["health_description", "health_goal"];

    fn bind<'q>(self, query: RecordQuery<'q, Self>) -> RecordQuery<'q, Self> {
        query.bind(self.health_description).bind(self.health_goal)
    }
}
