use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::impl_resource;
use super::team::License;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub iso2: String,
    pub iso3: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    pub tel: String,
    pub mobile: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub county: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub country: Option<Country>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: i64,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub nationality: Option<Country>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A club member with the person behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub license: License,
    #[serde(default)]
    pub remark: String,
    pub active: bool,
    pub competition: bool,
    #[serde(default)]
    pub person: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl_resource!(Country, "countries");
impl_resource!(Contact, "contacts");
impl_resource!(Person, "persons");
impl_resource!(Member, "members");
