use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::impl_resource;
use super::portal::Text;

/// A related resource side-loaded with its name only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub weekday: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub active: bool,
    pub location: String,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub team: Option<Named>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEvent {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub active: bool,
}

/// Presence and payment flags of a coach on one training
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingCoach {
    pub id: String,
    pub head: bool,
    pub present: bool,
    pub payed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub event: TrainingEvent,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub texts: Vec<Text>,
    #[serde(default)]
    pub coaches: Vec<TrainingCoach>,
    #[serde(default)]
    pub coach_resources: Vec<Named>,
    #[serde(default)]
    pub teams: Vec<Named>,
    #[serde(default)]
    pub definition: Option<Named>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl_resource!(TrainingDefinition, "training_definitions");
impl_resource!(Training, "trainings");
