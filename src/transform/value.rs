use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// A mapped attribute or relationship value.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Time(NaiveTime),
    List(Vec<DomainValue>),
    Object(BTreeMap<String, DomainValue>),
    /// A dereferenced related resource
    Resource(Box<DomainObject>),
    /// Untyped JSON, copied as received
    Json(Value),
}

impl DomainValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DomainValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DomainValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DomainValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DomainValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&DomainObject> {
        match self {
            DomainValue::Resource(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[DomainValue]> {
        match self {
            DomainValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert to plain JSON. Timestamps become RFC 3339 strings in UTC,
    /// dates `YYYY-MM-DD` and times `HH:MM:SS`.
    pub fn to_json(&self) -> Value {
        match self {
            DomainValue::Null => Value::Null,
            DomainValue::Bool(b) => Value::Bool(*b),
            DomainValue::Integer(i) => Value::from(*i),
            DomainValue::Number(n) => serde_json::Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null),
            DomainValue::String(s) => Value::String(s.clone()),
            DomainValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            DomainValue::DateTime(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            DomainValue::Time(t) => Value::String(t.format("%H:%M:%S").to_string()),
            DomainValue::List(items) => Value::Array(items.iter().map(DomainValue::to_json).collect()),
            DomainValue::Object(fields) => {
                Value::Object(fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
            DomainValue::Resource(object) => object.to_json(),
            DomainValue::Json(value) => value.clone(),
        }
    }
}

impl Serialize for DomainValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// The dereferenced representation of one resource: its id, the type it was
/// read from and the mapped fields keyed by domain name.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainObject {
    pub id: Option<String>,
    pub resource_type: String,
    pub fields: BTreeMap<String, DomainValue>,
}

impl DomainObject {
    pub fn new(resource_type: impl Into<String>, id: Option<String>) -> Self {
        Self { id, resource_type: resource_type.into(), fields: BTreeMap::new() }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn get(&self, field: &str) -> Option<&DomainValue> {
        self.fields.get(field)
    }

    /// Look up a dotted domain path, e.g. `license.number`
    pub fn get_path(&self, path: &str) -> Option<&DomainValue> {
        get_field(&self.fields, path)
    }

    /// Set a value at a dotted domain path, creating nested objects
    pub fn set_path(&mut self, path: &str, value: DomainValue) {
        insert_field(&mut self.fields, path, value);
    }

    /// JSON form: `id` (when known) next to every field. The type is not part of it.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }
}

impl Serialize for DomainObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.fields.len() + usize::from(self.id.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(id) = &self.id {
            map.serialize_entry("id", id)?;
        }
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub(crate) fn get_field<'v>(fields: &'v BTreeMap<String, DomainValue>, path: &str) -> Option<&'v DomainValue> {
    match path.split_once('.') {
        None => fields.get(path),
        Some((head, rest)) => match fields.get(head)? {
            DomainValue::Object(inner) => get_field(inner, rest),
            _ => None,
        },
    }
}

pub(crate) fn insert_field(fields: &mut BTreeMap<String, DomainValue>, path: &str, value: DomainValue) {
    match path.split_once('.') {
        None => {
            fields.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = fields.entry(head.to_string()).or_insert_with(|| DomainValue::Object(BTreeMap::new()));
            if !matches!(entry, DomainValue::Object(_)) {
                *entry = DomainValue::Object(BTreeMap::new());
            }
            if let DomainValue::Object(inner) = entry {
                insert_field(inner, rest, value);
            }
        }
    }
}
