use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Describes one resource kind: its type tag, the attributes it carries,
/// its relationships and the resource level meta fields worth mapping.
///
/// A descriptor is registered under `name`. Most descriptors use their type as
/// name; summaries of a resource that is side-loaded with fewer attributes get
/// their own name (e.g. `teams.summary`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSpec>,
    #[serde(default)]
    pub meta: Vec<AttributeSpec>,
}

impl ResourceDescriptor {
    pub fn new(resource_type: impl Into<String>) -> Self {
        let resource_type = resource_type.into();
        Self {
            name: resource_type.clone(),
            resource_type,
            attributes: Vec::new(),
            relationships: Vec::new(),
            meta: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn attribute(mut self, spec: AttributeSpec) -> Self {
        self.attributes.push(spec);
        self
    }

    pub fn relationship(mut self, spec: RelationshipSpec) -> Self {
        self.relationships.push(spec);
        self
    }

    pub fn meta(mut self, spec: AttributeSpec) -> Self {
        self.meta.push(spec);
        self
    }

    pub fn find_attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn find_relationship(&self, name: &str) -> Option<&RelationshipSpec> {
        self.relationships.iter().find(|r| r.name == name)
    }
}

/// The primitive or composite kind of an attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Integer,
    Number,
    Boolean,
    /// Calendar date, `%Y-%m-%d` unless the attribute declares a format
    Date,
    /// UTC timestamp, `%Y-%m-%d %H:%M:%S` unless the attribute declares a format
    DateTime,
    /// Time of day, `%H:%M` unless the attribute declares a format
    Time,
    /// Anything, copied as is
    Any,
    Array(Box<FieldKind>),
    Object(Vec<AttributeSpec>),
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Time => "time",
            FieldKind::Any => "any",
            FieldKind::Array(_) => "array",
            FieldKind::Object(_) => "object",
        }
    }
}

fn default_true() -> bool {
    true
}

/// Declares one attribute.
///
/// `name` is the wire name and may be a dotted path into nested wire objects
/// (`event.start_date`). `field` is the domain path, also dotted for nested
/// domain objects (`license.number`); it defaults to the camelCase of `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub kind: FieldKind,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            field: None,
            kind,
            nullable: false,
            required: true,
            default: None,
            format: None,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: &str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn datetime(name: &str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    pub fn time(name: &str) -> Self {
        Self::new(name, FieldKind::Time)
    }

    pub fn any(name: &str) -> Self {
        Self::new(name, FieldKind::Any)
    }

    pub fn array(name: &str, items: FieldKind) -> Self {
        Self::new(name, FieldKind::Array(Box::new(items)))
    }

    pub fn object(name: &str, fields: Vec<AttributeSpec>) -> Self {
        Self::new(name, FieldKind::Object(fields))
    }

    /// Domain path this attribute is mapped to.
    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Value used when the attribute is missing. Implies optional.
    pub fn default_value(mut self, value: Value) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }

    pub fn format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn domain_field(&self) -> String {
        match &self.field {
            Some(field) => field.clone(),
            None => camel_case_path(&self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    One,
    Many,
}

/// Declares one relationship.
///
/// `target` is the resource type the identifiers must carry, `schema` the
/// descriptor used to map the related resource (defaults to `target`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub cardinality: Cardinality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl RelationshipSpec {
    pub fn one(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::One)
    }

    pub fn many(name: &str, target: &str) -> Self {
        Self::new(name, target, Cardinality::Many)
    }

    fn new(name: &str, target: &str, cardinality: Cardinality) -> Self {
        Self {
            name: name.to_string(),
            field: None,
            cardinality,
            target: Some(target.to_string()),
            schema: None,
            required: false,
        }
    }

    pub fn field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn domain_field(&self) -> String {
        match &self.field {
            Some(field) => field.clone(),
            None => camel_case_path(&self.name),
        }
    }

    /// Descriptor name used for related resources, if any is known.
    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_deref().or(self.target.as_deref())
    }
}

/// `license_end_date` -> `licenseEndDate`, `iso_2` -> `iso2`
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = !out.is_empty();
            continue;
        }
        if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// camelCase every segment of a dotted path
pub fn camel_case_path(path: &str) -> String {
    path.split('.').map(camel_case).collect::<Vec<_>>().join(".")
}

/// Look up a dotted path in a JSON object.
pub fn get_path<'v>(map: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Insert a value at a dotted path, creating intermediate objects.
/// A non-object value in the way is replaced.
pub fn insert_path(map: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            map.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = map.entry(head.to_string()).or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_names() {
        assert_eq!(camel_case("license_end_date"), "licenseEndDate");
        assert_eq!(camel_case("iso_2"), "iso2");
        assert_eq!(camel_case("name"), "name");
        assert_eq!(camel_case("_private"), "private");
        assert_eq!(camel_case_path("event.start_date"), "event.startDate");
    }

    #[test]
    fn domain_field_defaults_to_camel_case() {
        assert_eq!(AttributeSpec::string("first_name").domain_field(), "firstName");
        assert_eq!(AttributeSpec::string("license_number").field("license.number").domain_field(), "license.number");
        assert_eq!(RelationshipSpec::many("team_members", "team_members").domain_field(), "teamMembers");
    }

    #[test]
    fn default_value_makes_attribute_optional() {
        let spec = AttributeSpec::boolean("new").default_value(json!(false));
        assert!(!spec.required);
        assert_eq!(spec.default, Some(json!(false)));
    }

    #[test]
    fn dotted_paths() {
        let mut map = Map::new();
        insert_path(&mut map, "event.start_date", json!("2024-01-01 10:00:00"));
        insert_path(&mut map, "event.active", json!(true));
        assert_eq!(Value::Object(map.clone()), json!({"event": {"start_date": "2024-01-01 10:00:00", "active": true}}));
        assert_eq!(get_path(&map, "event.active"), Some(&json!(true)));
        assert_eq!(get_path(&map, "event.missing"), None);
        assert_eq!(get_path(&map, "event.active.deeper"), None);
    }

    #[test]
    fn schema_name_prefers_explicit_schema() {
        let rel = RelationshipSpec::one("team", "teams").schema("teams.summary");
        assert_eq!(rel.schema_name(), Some("teams.summary"));
        assert_eq!(RelationshipSpec::one("team", "teams").schema_name(), Some("teams"));
    }
}
