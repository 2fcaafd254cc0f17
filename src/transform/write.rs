use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::read::decode_value;
use super::value::{get_field, DomainObject, DomainValue};
use crate::error::TransformError;
use crate::jsonapi::{Relationship, ResourceIdentifier, ResourceObject};
use crate::schema::dates;
use crate::schema::{insert_path, AttributeSpec, Cardinality, FieldKind, RelationshipSpec, ResourceDescriptor};

/// Build the write resource for a domain object: declared attributes under
/// their wire names, relationships as bare identifiers (every declared
/// relationship is written). Resource meta is owned by the server and never
/// written.
pub(crate) fn encode(descriptor: &ResourceDescriptor, object: &DomainObject) -> Result<ResourceObject, TransformError> {
    let mut resource = ResourceObject::new(descriptor.resource_type.clone(), object.id.clone());

    for spec in &descriptor.attributes {
        if let Some(value) = object.get_path(&spec.domain_field()) {
            let encoded = encode_value(spec, &spec.kind, value)?;
            insert_path(&mut resource.attributes, &spec.name, encoded);
        }
    }

    let mut relationships = BTreeMap::new();
    for spec in &descriptor.relationships {
        let value = object.get_path(&spec.domain_field());
        match spec.cardinality {
            Cardinality::One => {
                // An empty to-one is written as `{ data: null }` so an update can clear it
                let identifier = match value {
                    None | Some(DomainValue::Null) => None,
                    Some(value) => reference(spec, value),
                };
                relationships.insert(spec.name.clone(), Relationship::one(identifier));
            }
            Cardinality::Many => {
                let identifiers = match value {
                    Some(DomainValue::List(items)) => items.iter().filter_map(|item| reference(spec, item)).collect(),
                    None | Some(DomainValue::Null) => Vec::new(),
                    Some(_) => {
                        return Err(TransformError::payload(format!(
                            "relationship '{}' of '{}' must be a list",
                            spec.name, descriptor.resource_type
                        )))
                    }
                };
                relationships.insert(spec.name.clone(), Relationship::many(identifiers));
            }
        }
    }
    if !relationships.is_empty() {
        resource.relationships = Some(relationships);
    }

    Ok(resource)
}

/// Identifier for a related value. Dropped with a warning when its type can't be told.
fn reference(spec: &RelationshipSpec, value: &DomainValue) -> Option<ResourceIdentifier> {
    let related = match value {
        DomainValue::Resource(related) => related,
        other => {
            tracing::warn!("Dropping relationship '{}': expected a resource, got {:?}", spec.name, other);
            return None;
        }
    };
    let resource_type = if related.resource_type.is_empty() {
        spec.target.clone()
    } else {
        Some(related.resource_type.clone())
    };
    match resource_type {
        Some(resource_type) => Some(ResourceIdentifier::new(resource_type, related.id.clone())),
        None => {
            tracing::warn!("Dropping relationship '{}': target type is unknown", spec.name);
            None
        }
    }
}

fn encode_value(spec: &AttributeSpec, kind: &FieldKind, value: &DomainValue) -> Result<Value, TransformError> {
    let format = spec.format.as_deref();
    let encoded = match (kind, value) {
        (_, DomainValue::Null) => Value::Null,
        (FieldKind::Date, DomainValue::Date(date)) => Value::String(dates::format_date(date, format)),
        (FieldKind::DateTime, DomainValue::DateTime(dt)) => Value::String(dates::format_datetime(dt, format)),
        (FieldKind::Time, DomainValue::Time(time)) => Value::String(dates::format_time(time, format)),
        (FieldKind::Array(items), DomainValue::List(values)) => Value::Array(
            values
                .iter()
                .map(|item| encode_value(spec, items, item))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        (FieldKind::Object(children), DomainValue::Object(fields)) => {
            let mut map = Map::new();
            for child in children {
                if let Some(child_value) = get_field(fields, &child.domain_field()) {
                    insert_path(&mut map, &child.name, encode_value(child, &child.kind, child_value)?);
                }
            }
            Value::Object(map)
        }
        (FieldKind::Date | FieldKind::DateTime | FieldKind::Time | FieldKind::Array(_) | FieldKind::Object(_), DomainValue::Json(_)) => {
            // Untyped JSON handed in for a typed attribute: parse it first
            let json = value.to_json();
            return match decode_value(spec, kind, &json) {
                DomainValue::Json(_) => Err(mismatch(spec, kind)),
                typed => encode_value(spec, kind, &typed),
            };
        }
        (FieldKind::String, DomainValue::String(_))
        | (FieldKind::Integer, DomainValue::Integer(_))
        | (FieldKind::Number, DomainValue::Number(_) | DomainValue::Integer(_))
        | (FieldKind::Boolean, DomainValue::Bool(_))
        | (_, DomainValue::Json(_)) => value.to_json(),
        (FieldKind::Any, DomainValue::Resource(_)) => return Err(mismatch(spec, kind)),
        (FieldKind::Any, other) => other.to_json(),
        _ => return Err(mismatch(spec, kind)),
    };
    Ok(encoded)
}

fn mismatch(spec: &AttributeSpec, kind: &FieldKind) -> TransformError {
    TransformError::payload(format!("attribute '{}' must be a {}", spec.name, kind.label()))
}

/// Turn the JSON form of a typed model (camelCase, chrono dates) into a
/// domain object the encoder understands.
pub(crate) fn lift(descriptor: &ResourceDescriptor, model: &Value) -> Result<DomainObject, TransformError> {
    let Some(fields) = model.as_object() else {
        return Err(TransformError::payload(format!(
            "a '{}' model must serialize to an object",
            descriptor.resource_type
        )));
    };

    let id = match fields.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(Value::Number(id)) => Some(id.to_string()),
        Some(_) => return Err(TransformError::payload("id must be a string")),
    };
    let mut object = DomainObject::new(descriptor.resource_type.clone(), id);

    for spec in &descriptor.attributes {
        let field = spec.domain_field();
        if let Some(value) = crate::schema::get_path(fields, &field) {
            object.set_path(&field, decode_value(spec, &spec.kind, value));
        }
    }

    for spec in &descriptor.relationships {
        let field = spec.domain_field();
        let Some(value) = crate::schema::get_path(fields, &field) else {
            continue;
        };
        let lifted = match value {
            Value::Null => DomainValue::Null,
            Value::Array(items) => DomainValue::List(items.iter().filter_map(|item| lift_related(spec, item)).collect()),
            item => lift_related(spec, item).unwrap_or(DomainValue::Null),
        };
        object.set_path(&field, lifted);
    }

    Ok(object)
}

fn lift_related(spec: &RelationshipSpec, value: &Value) -> Option<DomainValue> {
    let related = value.as_object()?;
    let id = related.get("id").and_then(|id| match id {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    });
    let resource_type = related
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| spec.target.clone())
        .unwrap_or_default();
    Some(DomainValue::Resource(Box::new(DomainObject::new(resource_type, id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RelationshipSpec;
    use serde_json::json;

    fn team_members() -> ResourceDescriptor {
        ResourceDescriptor::new("team_members")
            .attribute(AttributeSpec::string("license_number").field("license.number"))
            .attribute(AttributeSpec::date("license_end_date").field("license.endDate"))
            .relationship(RelationshipSpec::one("nationality", "countries"))
    }

    #[test]
    fn nested_domain_fields_are_flattened() {
        let object = lift(
            &team_members(),
            &json!({"id": "7", "license": {"number": "BEL-1", "endDate": "2025-01-31"}, "nationality": {"id": "32"}}),
        )
        .unwrap();
        let resource = encode(&team_members(), &object).unwrap();
        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({
                "id": "7",
                "type": "team_members",
                "attributes": {"license_number": "BEL-1", "license_end_date": "2025-01-31"},
                "relationships": {"nationality": {"data": {"id": "32", "type": "countries"}}}
            })
        );
    }

    #[test]
    fn empty_to_one_is_written_as_null() {
        let object = lift(&team_members(), &json!({"license": {"number": "X"}, "nationality": null})).unwrap();
        let resource = encode(&team_members(), &object).unwrap();
        assert!(resource.id.is_none());
        assert_eq!(
            serde_json::to_value(&resource).unwrap()["relationships"],
            json!({"nationality": {"data": null}})
        );

        // A field the model doesn't carry at all is cleared the same way
        let object = lift(&team_members(), &json!({"license": {"number": "X"}})).unwrap();
        let resource = encode(&team_members(), &object).unwrap();
        assert_eq!(resource.relationship("nationality").and_then(|r| r.data.as_ref()), None);
        assert!(resource.relationship("nationality").is_some());
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut object = DomainObject::new("team_members", None);
        object.set_path("license.endDate", DomainValue::Bool(true));
        let err = encode(&team_members(), &object).unwrap_err();
        assert!(matches!(err, TransformError::Payload(_)));
    }
}
