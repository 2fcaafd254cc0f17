use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::value::{insert_field, DomainObject, DomainValue};
use super::TransformOptions;
use crate::jsonapi::{RelationshipData, ResourceIdentifier, ResourceIndex, ResourceObject};
use crate::schema::dates;
use crate::schema::{camel_case, get_path, AttributeSpec, Cardinality, FieldKind, RelationshipSpec, ResourceDescriptor, SchemaRegistry};

/// Maps validated resource objects to domain objects, resolving relationships
/// through the index of one document. Lives for a single transform call.
pub(crate) struct Decoder<'a> {
    registry: &'a SchemaRegistry,
    index: ResourceIndex<'a>,
    options: &'a TransformOptions,
    /// Resources being mapped on the current path, to cut relationship cycles
    stack: Vec<(String, String, Option<String>)>,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a SchemaRegistry, included: &'a [ResourceObject], options: &'a TransformOptions) -> Self {
        Self {
            registry,
            index: ResourceIndex::build(included),
            options,
            stack: Vec::new(),
        }
    }

    pub fn decode(&mut self, descriptor: &ResourceDescriptor, resource: &ResourceObject) -> DomainObject {
        self.stack.push((descriptor.name.clone(), resource.resource_type.clone(), resource.id.clone()));

        let mut object = DomainObject::new(resource.resource_type.clone(), resource.id.clone());

        for spec in &descriptor.attributes {
            if let Some(value) = get_path(&resource.attributes, &spec.name) {
                object.set_path(&spec.domain_field(), decode_value(spec, &spec.kind, value));
            }
        }

        if let Some(meta) = &resource.meta {
            for spec in &descriptor.meta {
                if let Some(value) = get_path(meta, &spec.name) {
                    object.set_path(&spec.domain_field(), decode_value(spec, &spec.kind, value));
                }
            }
        }

        for spec in &descriptor.relationships {
            let value = self.decode_relationship(resource, spec);
            object.set_path(&spec.domain_field(), value);
        }

        self.stack.pop();
        object
    }

    fn decode_relationship(&mut self, resource: &ResourceObject, spec: &RelationshipSpec) -> DomainValue {
        let data = resource.relationship(&spec.name).and_then(|r| r.data.as_ref());
        match (spec.cardinality, data) {
            (Cardinality::One, Some(RelationshipData::One(identifier))) => {
                self.dereference(spec, identifier).unwrap_or(DomainValue::Null)
            }
            (Cardinality::One, _) => DomainValue::Null,
            (Cardinality::Many, Some(RelationshipData::Many(identifiers))) => DomainValue::List(
                identifiers
                    .iter()
                    .filter_map(|identifier| self.dereference(spec, identifier))
                    .collect(),
            ),
            (Cardinality::Many, _) => DomainValue::List(Vec::new()),
        }
    }

    fn dereference(&mut self, spec: &RelationshipSpec, identifier: &ResourceIdentifier) -> Option<DomainValue> {
        let Some(related) = self.index.resolve(identifier) else {
            if self.options.log_unresolved_relationships {
                tracing::debug!(
                    "Unresolved relationship '{}': {}:{} is not included",
                    spec.name,
                    identifier.resource_type,
                    identifier.id.as_deref().unwrap_or("<new>")
                );
            }
            return None;
        };

        let registry = self.registry;
        let descriptor = spec.schema_name().and_then(|name| registry.get(name));
        let schema = descriptor.map(|d| d.name.as_str()).unwrap_or("");
        let cyclic = self
            .stack
            .iter()
            .any(|(name, ty, id)| name == schema && *ty == related.resource_type && *id == related.id);
        if cyclic {
            tracing::debug!(
                "Relationship cycle at '{}': {}:{} is already being mapped",
                spec.name,
                related.resource_type,
                related.id.as_deref().unwrap_or("")
            );
            return None;
        }

        let object = match descriptor {
            Some(descriptor) => self.decode(descriptor, related),
            None => decode_generic(related),
        };
        Some(DomainValue::Resource(Box::new(object)))
    }
}

/// Map a resource nobody declared a descriptor for: every attribute is kept
/// as untyped JSON under its camelCase name.
pub(crate) fn decode_generic(resource: &ResourceObject) -> DomainObject {
    let mut object = DomainObject::new(resource.resource_type.clone(), resource.id.clone());
    object.fields = generic_fields(&resource.attributes);
    object
}

fn generic_fields(attributes: &Map<String, Value>) -> BTreeMap<String, DomainValue> {
    attributes
        .iter()
        .map(|(name, value)| (camel_case(name), DomainValue::Json(value.clone())))
        .collect()
}

/// Convert a validated wire value. Values that still fail to parse (which
/// validation rules out) fall back to untyped JSON.
pub(crate) fn decode_value(spec: &AttributeSpec, kind: &FieldKind, value: &Value) -> DomainValue {
    if value.is_null() {
        return DomainValue::Null;
    }
    let format = spec.format.as_deref();
    let decoded = match kind {
        FieldKind::String => value.as_str().map(|s| DomainValue::String(s.to_string())),
        FieldKind::Integer => value
            .as_i64()
            .map(DomainValue::Integer)
            .or_else(|| value.as_f64().map(DomainValue::Number)),
        FieldKind::Number => value.as_f64().map(DomainValue::Number),
        FieldKind::Boolean => value.as_bool().map(DomainValue::Bool),
        FieldKind::Date => value
            .as_str()
            .and_then(|s| dates::parse_date(s, format).ok())
            .map(DomainValue::Date),
        FieldKind::DateTime => value
            .as_str()
            .and_then(|s| dates::parse_datetime(s, format).ok())
            .map(DomainValue::DateTime),
        FieldKind::Time => value
            .as_str()
            .and_then(|s| dates::parse_time(s, format).ok())
            .map(DomainValue::Time),
        FieldKind::Any => Some(DomainValue::Json(value.clone())),
        FieldKind::Array(items) => value
            .as_array()
            .map(|values| DomainValue::List(values.iter().map(|item| decode_value(spec, items, item)).collect())),
        FieldKind::Object(children) => value.as_object().map(|object| {
            let mut fields = BTreeMap::new();
            for child in children {
                match get_path(object, &child.name) {
                    Some(child_value) => {
                        insert_field(&mut fields, &child.domain_field(), decode_value(child, &child.kind, child_value))
                    }
                    None => {
                        if let Some(default) = &child.default {
                            insert_field(&mut fields, &child.domain_field(), decode_value(child, &child.kind, default))
                        }
                    }
                }
            }
            DomainValue::Object(fields)
        }),
    };
    decoded.unwrap_or_else(|| DomainValue::Json(value.clone()))
}
