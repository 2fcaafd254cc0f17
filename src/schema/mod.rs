//! Resource schema registry.
//!
//! Holds the declarative descriptors for every resource kind and validates raw
//! documents against them before any mapping happens.

pub mod dates;
pub mod descriptor;
pub mod error;
pub mod resources;
pub mod validate;

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use descriptor::*;
pub use error::{SchemaError, ValidationError, Violation};

use crate::jsonapi::Document;

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    descriptors: HashMap<String, ResourceDescriptor>,
}

impl SchemaRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the descriptors for every kwai resource kind
    pub fn kwai() -> Self {
        let mut registry = Self::new();
        for descriptor in resources::all() {
            registry.register(descriptor);
        }
        registry
    }

    /// Register a descriptor under its name (its type when no name is set).
    /// Returns the descriptor it replaced, if any.
    pub fn register(&mut self, mut descriptor: ResourceDescriptor) -> Option<ResourceDescriptor> {
        if descriptor.name.is_empty() {
            descriptor.name = descriptor.resource_type.clone();
        }
        self.descriptors.insert(descriptor.name.clone(), descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.descriptors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Registered descriptor names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Validate `raw` as a document whose primary data is described by `descriptor`.
    pub fn validate(&self, descriptor: &ResourceDescriptor, raw: Value) -> Result<Document, ValidationError> {
        validate::validate_document(self, descriptor, raw)
    }

    /// Register every descriptor in a YAML list. Returns how many were added.
    pub fn load_yaml_str(&mut self, content: &str) -> Result<usize, SchemaError> {
        let descriptors: Vec<ResourceDescriptor> = serde_yaml::from_str(content)?;
        self.register_all(descriptors)
    }

    /// Register every descriptor in a JSON array. Returns how many were added.
    pub fn load_json_str(&mut self, content: &str) -> Result<usize, SchemaError> {
        let descriptors: Vec<ResourceDescriptor> = serde_json::from_str(content)?;
        self.register_all(descriptors)
    }

    /// Load descriptors from a `.json`, `.yaml` or `.yml` file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, SchemaError> {
        let path = path.as_ref();
        let yaml = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => false,
            Some("yaml") | Some("yml") => true,
            _ => {
                return Err(SchemaError::Invalid(format!(
                    "unsupported schema file extension: {}",
                    path.display()
                )))
            }
        };
        let content = fs::read_to_string(path)?;
        let count = if yaml { self.load_yaml_str(&content)? } else { self.load_json_str(&content)? };
        tracing::debug!("Loaded {} resource descriptors from {}", count, path.display());
        Ok(count)
    }

    fn register_all(&mut self, descriptors: Vec<ResourceDescriptor>) -> Result<usize, SchemaError> {
        for descriptor in &descriptors {
            Self::check_descriptor(descriptor)?;
        }
        let count = descriptors.len();
        for descriptor in descriptors {
            self.register(descriptor);
        }
        Ok(count)
    }

    fn check_descriptor(descriptor: &ResourceDescriptor) -> Result<(), SchemaError> {
        if descriptor.resource_type.is_empty() {
            return Err(SchemaError::Invalid("descriptor type cannot be empty".to_string()));
        }
        for spec in descriptor.attributes.iter().chain(descriptor.meta.iter()) {
            if spec.name.is_empty() || spec.name.split('.').any(str::is_empty) {
                return Err(SchemaError::Invalid(format!(
                    "invalid attribute name '{}' in '{}'",
                    spec.name, descriptor.resource_type
                )));
            }
        }
        for spec in &descriptor.relationships {
            if spec.name.is_empty() {
                return Err(SchemaError::Invalid(format!(
                    "empty relationship name in '{}'",
                    descriptor.resource_type
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_defaults_name_to_type() {
        let mut registry = SchemaRegistry::new();
        let mut descriptor = ResourceDescriptor::new("countries");
        descriptor.name = String::new();
        registry.register(descriptor);
        assert!(registry.contains("countries"));
    }

    #[test]
    fn load_yaml_descriptors() {
        let yaml = r#"
- type: countries
  attributes:
    - name: iso_2
      kind: string
    - name: name
      kind: string
- type: coaches
  attributes:
    - name: name
      kind: string
    - name: remark
      kind: string
      required: false
  relationships:
    - name: nationality
      cardinality: one
      target: countries
"#;
        let mut registry = SchemaRegistry::new();
        assert_eq!(registry.load_yaml_str(yaml).unwrap(), 2);

        let coaches = registry.get("coaches").unwrap();
        assert!(!coaches.find_attribute("remark").unwrap().required);
        assert_eq!(coaches.find_relationship("nationality").unwrap().cardinality, Cardinality::One);
    }

    #[test]
    fn invalid_descriptor_is_rejected() {
        let mut registry = SchemaRegistry::new();
        let err = registry.load_json_str(r#"[{"type": ""}]"#).unwrap_err();
        assert!(matches!(err, SchemaError::Invalid(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn kwai_registry_has_builtin_resources() {
        let registry = SchemaRegistry::kwai();
        for name in ["countries", "teams", "team_members", "members", "news_items", "training_definitions"] {
            assert!(registry.contains(name), "missing {}", name);
        }
    }
}
