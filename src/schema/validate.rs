use serde_json::{Map, Value};
use std::collections::HashSet;

use super::dates;
use super::descriptor::{get_path, insert_path, AttributeSpec, Cardinality, FieldKind, ResourceDescriptor};
use super::error::{ValidationError, Violation};
use super::SchemaRegistry;
use crate::jsonapi::{Document, RelationshipData, ResourceIndex, ResourceObject};

/// Where a default has to be written once validation passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Primary(usize),
    Included(usize),
}

#[derive(Debug)]
enum Target {
    Attributes,
    Meta,
}

#[derive(Debug)]
struct Fill {
    location: Location,
    target: Target,
    path: String,
    value: Value,
}

/// Validate a raw JSON value as a document whose primary data is described
/// by `descriptor`. On success the parsed document is returned with declared
/// defaults filled in.
pub fn validate_document(
    registry: &SchemaRegistry,
    descriptor: &ResourceDescriptor,
    raw: Value,
) -> Result<Document, ValidationError> {
    let mut validator = Validator::new(registry);

    validator.check_envelope(&raw);
    validator.finish()?;

    let mut document: Document =
        serde_json::from_value(raw).map_err(|e| ValidationError::single("", e.to_string()))?;

    let fills = validator.check_schemas(descriptor, &document);
    validator.finish()?;

    apply_fills(&mut document, fills);
    Ok(document)
}

struct Validator<'r> {
    registry: &'r SchemaRegistry,
    violations: Vec<Violation>,
}

impl<'r> Validator<'r> {
    fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry, violations: Vec::new() }
    }

    fn violation(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    fn finish(&mut self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(std::mem::take(&mut self.violations)))
        }
    }

    // ========================================
    // Generic JSON:API shape
    // ========================================

    fn check_envelope(&mut self, raw: &Value) {
        let Some(root) = raw.as_object() else {
            self.violation("", format!("expected object, received {}", type_name(raw)));
            return;
        };

        if let Some(meta) = root.get("meta") {
            self.check_meta(meta);
        }

        match root.get("data") {
            None => self.violation("data", "required"),
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.check_resource_shape(&format!("data.{}", i), item);
                }
            }
            Some(item @ Value::Object(_)) => self.check_resource_shape("data", item),
            Some(other) => self.violation("data", format!("expected object or array, received {}", type_name(other))),
        }

        match root.get("included") {
            None => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.check_resource_shape(&format!("included.{}", i), item);
                }
            }
            Some(other) => self.violation("included", format!("expected array, received {}", type_name(other))),
        }

        match root.get("errors") {
            None => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.check_error_object(&format!("errors.{}", i), item);
                }
            }
            Some(other) => self.violation("errors", format!("expected array, received {}", type_name(other))),
        }
    }

    fn check_meta(&mut self, meta: &Value) {
        let Some(meta) = meta.as_object() else {
            self.violation("meta", format!("expected object, received {}", type_name(meta)));
            return;
        };
        if let Some(count) = meta.get("count") {
            if !count.is_u64() {
                self.violation("meta.count", format!("expected non-negative integer, received {}", type_name(count)));
            }
        }
        for key in ["offset", "limit"] {
            if let Some(value) = meta.get(key) {
                if !(value.is_null() || value.is_u64()) {
                    self.violation(
                        format!("meta.{}", key),
                        format!("expected non-negative integer or null, received {}", type_name(value)),
                    );
                }
            }
        }
    }

    fn check_resource_shape(&mut self, path: &str, value: &Value) {
        let Some(resource) = value.as_object() else {
            self.violation(path, format!("expected object, received {}", type_name(value)));
            return;
        };

        self.check_identifier_fields(path, resource);

        match resource.get("attributes") {
            None => self.violation(format!("{}.attributes", path), "required"),
            Some(Value::Object(_)) => {}
            Some(other) => self.violation(
                format!("{}.attributes", path),
                format!("expected object, received {}", type_name(other)),
            ),
        }

        if let Some(meta) = resource.get("meta") {
            if !meta.is_object() {
                self.violation(format!("{}.meta", path), format!("expected object, received {}", type_name(meta)));
            }
        }

        match resource.get("relationships") {
            None => {}
            Some(Value::Object(relationships)) => {
                for (name, relationship) in relationships {
                    self.check_relationship_shape(&format!("{}.relationships.{}", path, name), relationship);
                }
            }
            Some(other) => self.violation(
                format!("{}.relationships", path),
                format!("expected object, received {}", type_name(other)),
            ),
        }
    }

    fn check_identifier_fields(&mut self, path: &str, object: &Map<String, Value>) {
        match object.get("type") {
            None => self.violation(format!("{}.type", path), "required"),
            Some(Value::String(_)) => {}
            Some(other) => self.violation(
                format!("{}.type", path),
                format!("expected string, received {}", type_name(other)),
            ),
        }
        if let Some(id) = object.get("id") {
            if !(id.is_string() || id.is_null()) {
                self.violation(format!("{}.id", path), format!("expected string, received {}", type_name(id)));
            }
        }
    }

    fn check_relationship_shape(&mut self, path: &str, value: &Value) {
        let Some(relationship) = value.as_object() else {
            self.violation(path, format!("expected object, received {}", type_name(value)));
            return;
        };
        match relationship.get("data") {
            None => self.violation(format!("{}.data", path), "required"),
            Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.check_identifier(&format!("{}.data.{}", path, i), item);
                }
            }
            Some(item) => self.check_identifier(&format!("{}.data", path), item),
        }
    }

    fn check_identifier(&mut self, path: &str, value: &Value) {
        match value.as_object() {
            Some(identifier) => self.check_identifier_fields(path, identifier),
            None => self.violation(path, format!("expected resource identifier, received {}", type_name(value))),
        }
    }

    fn check_error_object(&mut self, path: &str, value: &Value) {
        let Some(error) = value.as_object() else {
            self.violation(path, format!("expected object, received {}", type_name(value)));
            return;
        };
        for key in ["status", "title", "detail"] {
            if let Some(field) = error.get(key) {
                if !field.is_string() {
                    self.violation(format!("{}.{}", path, key), format!("expected string, received {}", type_name(field)));
                }
            }
        }
        if let Some(source) = error.get("source") {
            match source.get("pointer") {
                Some(Value::String(_)) => {}
                _ => self.violation(format!("{}.source.pointer", path), "expected string"),
            }
        }
    }

    // ========================================
    // Descriptor checks
    // ========================================

    fn check_schemas(&mut self, descriptor: &ResourceDescriptor, document: &Document) -> Vec<Fill> {
        let index = ResourceIndex::build(&document.included);
        let mut visited: HashSet<(String, usize)> = HashSet::new();
        let mut fills = Vec::new();

        let collection = document.data.is_collection();
        for (i, resource) in document.data.resources().into_iter().enumerate() {
            let path = if collection { format!("data.{}", i) } else { "data".to_string() };
            self.check_resource(descriptor, resource, &path, Location::Primary(i), &index, &mut visited, &mut fills);
        }

        fills
    }

    #[allow(clippy::too_many_arguments)]
    fn check_resource(
        &mut self,
        descriptor: &ResourceDescriptor,
        resource: &ResourceObject,
        path: &str,
        location: Location,
        index: &ResourceIndex<'_>,
        visited: &mut HashSet<(String, usize)>,
        fills: &mut Vec<Fill>,
    ) {
        let registry = self.registry;
        if resource.resource_type != descriptor.resource_type {
            self.violation(
                format!("{}.type", path),
                format!("expected '{}', received '{}'", descriptor.resource_type, resource.resource_type),
            );
            return;
        }

        for spec in &descriptor.attributes {
            let spec_path = format!("{}.attributes.{}", path, spec.name);
            match get_path(&resource.attributes, &spec.name) {
                Some(value) => self.check_value(&spec_path, spec, &spec.kind, value),
                None => {
                    if let Some(default) = &spec.default {
                        fills.push(Fill {
                            location,
                            target: Target::Attributes,
                            path: spec.name.clone(),
                            value: default.clone(),
                        });
                    } else if spec.required {
                        self.violation(spec_path, "required");
                    }
                }
            }
        }

        let empty = Map::new();
        let meta = resource.meta.as_ref().unwrap_or(&empty);
        for spec in &descriptor.meta {
            let spec_path = format!("{}.meta.{}", path, spec.name);
            match get_path(meta, &spec.name) {
                Some(value) => self.check_value(&spec_path, spec, &spec.kind, value),
                None => {
                    if let Some(default) = &spec.default {
                        fills.push(Fill {
                            location,
                            target: Target::Meta,
                            path: spec.name.clone(),
                            value: default.clone(),
                        });
                    } else if spec.required {
                        self.violation(spec_path, "required");
                    }
                }
            }
        }

        for spec in &descriptor.relationships {
            let rel_path = format!("{}.relationships.{}", path, spec.name);
            let Some(relationship) = resource.relationship(&spec.name) else {
                if spec.required {
                    self.violation(rel_path, "required");
                }
                continue;
            };

            let identifiers = match (&relationship.data, spec.cardinality) {
                (None, Cardinality::One) => Vec::new(),
                (Some(RelationshipData::One(identifier)), Cardinality::One) => {
                    vec![(format!("{}.data", rel_path), identifier)]
                }
                (Some(RelationshipData::Many(identifiers)), Cardinality::Many) => identifiers
                    .iter()
                    .enumerate()
                    .map(|(i, identifier)| (format!("{}.data.{}", rel_path, i), identifier))
                    .collect(),
                (_, Cardinality::One) => {
                    self.violation(format!("{}.data", rel_path), "expected resource identifier or null, received array");
                    continue;
                }
                (_, Cardinality::Many) => {
                    self.violation(format!("{}.data", rel_path), "expected array of resource identifiers");
                    continue;
                }
            };

            for (identifier_path, identifier) in identifiers {
                if let Some(target) = &spec.target {
                    if &identifier.resource_type != target {
                        self.violation(
                            format!("{}.type", identifier_path),
                            format!("expected '{}', received '{}'", target, identifier.resource_type),
                        );
                        continue;
                    }
                }

                // Unresolved references are fine here, the transformer leaves the field empty
                let (Some(related), Some(position)) = (index.resolve(identifier), index.position(identifier)) else {
                    continue;
                };
                let Some(related_descriptor) = spec.schema_name().and_then(|name| registry.get(name)) else {
                    continue;
                };
                if !visited.insert((related_descriptor.name.clone(), position)) {
                    continue;
                }
                self.check_resource(
                    related_descriptor,
                    related,
                    &format!("included.{}", position),
                    Location::Included(position),
                    index,
                    visited,
                    fills,
                );
            }
        }
    }

    fn check_value(&mut self, path: &str, spec: &AttributeSpec, kind: &FieldKind, value: &Value) {
        if value.is_null() {
            if !spec.nullable {
                self.violation(path, format!("expected {}, received null", kind.label()));
            }
            return;
        }

        let format = spec.format.as_deref();
        let ok = match kind {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Any => true,
            FieldKind::Date | FieldKind::DateTime | FieldKind::Time => {
                let Some(text) = value.as_str() else {
                    self.violation(path, format!("expected {}, received {}", kind.label(), type_name(value)));
                    return;
                };
                let parsed = match kind {
                    FieldKind::Date => dates::parse_date(text, format).map(|_| ()),
                    FieldKind::DateTime => dates::parse_datetime(text, format).map(|_| ()),
                    _ => dates::parse_time(text, format).map(|_| ()),
                };
                if parsed.is_err() {
                    self.violation(path, format!("invalid {} '{}'", kind.label(), text));
                }
                return;
            }
            FieldKind::Array(items) => {
                let Some(values) = value.as_array() else {
                    self.violation(path, format!("expected array, received {}", type_name(value)));
                    return;
                };
                let item_spec = AttributeSpec {
                    format: spec.format.clone(),
                    ..AttributeSpec::new(spec.name.clone(), (**items).clone())
                };
                for (i, item) in values.iter().enumerate() {
                    self.check_value(&format!("{}.{}", path, i), &item_spec, items, item);
                }
                return;
            }
            FieldKind::Object(children) => {
                let Some(object) = value.as_object() else {
                    self.violation(path, format!("expected object, received {}", type_name(value)));
                    return;
                };
                for child in children {
                    let child_path = format!("{}.{}", path, child.name);
                    match get_path(object, &child.name) {
                        Some(child_value) => self.check_value(&child_path, child, &child.kind, child_value),
                        None if child.required && child.default.is_none() => self.violation(child_path, "required"),
                        None => {}
                    }
                }
                return;
            }
        };

        if !ok {
            self.violation(path, format!("expected {}, received {}", kind.label(), type_name(value)));
        }
    }
}

fn apply_fills(document: &mut Document, fills: Vec<Fill>) {
    if fills.is_empty() {
        return;
    }
    let mut primary = document.data.resources_mut();
    for fill in fills {
        let resource = match fill.location {
            Location::Primary(i) => primary.get_mut(i).map(|r| &mut **r),
            Location::Included(i) => document.included.get_mut(i),
        };
        let Some(resource) = resource else { continue };
        let map = match fill.target {
            Target::Attributes => &mut resource.attributes,
            Target::Meta => resource.meta.get_or_insert_with(Map::new),
        };
        insert_path(map, &fill.path, fill.value);
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
