use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::club::Country;
use super::impl_resource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    pub number: String,
    pub end_date: NaiveDate,
}

fn active_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default = "active_default")]
    pub active: bool,
    pub first_name: String,
    pub last_name: String,
    pub license: License,
    pub gender: i64,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub active_in_club: bool,
    #[serde(default)]
    pub nationality: Option<Country>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub active: bool,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl_resource!(TeamMember, "team_members");
impl_resource!(Team, "teams");
