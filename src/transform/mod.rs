//! Document transformer.
//!
//! Reads validated JSON:API documents into dereferenced domain objects and
//! encodes domain objects back into write payloads. Every call builds its own
//! resource index, so a `Transformer` can be shared freely between threads.

mod read;
pub mod value;
mod write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub use value::{DomainObject, DomainValue};

use crate::config::AppConfig;
use crate::error::TransformError;
use crate::jsonapi::{Document, PrimaryData};
use crate::models::Resource;
use crate::schema::{ResourceDescriptor, SchemaRegistry};
use crate::types::Page;

#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Log relationship references that have no matching included resource
    pub log_unresolved_relationships: bool,
}

impl TransformOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            log_unresolved_relationships: config.transform.log_unresolved_relationships,
        }
    }
}

/// Result of mapping a document: one object for single resource documents,
/// a page for documents whose data is a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transformed<T> {
    Single(T),
    Collection(Page<T>),
}

impl<T> Transformed<T> {
    pub fn is_collection(&self) -> bool {
        matches!(self, Transformed::Collection(_))
    }

    pub fn into_single(self) -> Result<T, TransformError> {
        match self {
            Transformed::Single(item) => Ok(item),
            Transformed::Collection(_) => Err(TransformError::unexpected_shape("expected a single resource, received a list")),
        }
    }

    pub fn into_page(self) -> Result<Page<T>, TransformError> {
        match self {
            Transformed::Collection(page) => Ok(page),
            Transformed::Single(_) => Err(TransformError::unexpected_shape("expected a list of resources, received a single resource")),
        }
    }

    pub fn map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<Transformed<U>, E> {
        Ok(match self {
            Transformed::Single(item) => Transformed::Single(f(item)?),
            Transformed::Collection(page) => Transformed::Collection(page.map(f)?),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Transformer {
    registry: Arc<SchemaRegistry>,
    options: TransformOptions,
}

impl Transformer {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry, options: TransformOptions::default() }
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn descriptor(&self, schema: &str) -> Result<&ResourceDescriptor, TransformError> {
        self.registry.get(schema).ok_or_else(|| TransformError::unknown_schema(schema))
    }

    /// Validate a raw document against a registered descriptor.
    pub fn validate(&self, schema: &str, raw: Value) -> Result<Document, TransformError> {
        let descriptor = self.descriptor(schema)?;
        Ok(self.registry.validate(descriptor, raw)?)
    }

    /// Validate and map a raw document whose primary data is described by `schema`.
    pub fn transform_document(&self, schema: &str, raw: Value) -> Result<Transformed<DomainObject>, TransformError> {
        let descriptor = self.descriptor(schema)?;
        let document = self.registry.validate(descriptor, raw)?;
        Ok(self.map_document(descriptor, &document))
    }

    /// Map an already validated document.
    pub fn map_document(&self, descriptor: &ResourceDescriptor, document: &Document) -> Transformed<DomainObject> {
        let mut decoder = read::Decoder::new(&self.registry, &document.included, &self.options);
        match &document.data {
            PrimaryData::One(resource) => Transformed::Single(decoder.decode(descriptor, resource)),
            PrimaryData::Many(resources) => Transformed::Collection(Page {
                meta: document.pagination(),
                items: resources.iter().map(|resource| decoder.decode(descriptor, resource)).collect(),
            }),
        }
    }

    /// Validate and map a raw document into typed models.
    pub fn transform<T: Resource>(&self, raw: Value) -> Result<Transformed<T>, TransformError> {
        self.transform_document(T::SCHEMA, raw)?.map(|object| into_model::<T>(&object))
    }

    /// Encode a domain object as `{ data: { id?, type, attributes, relationships? } }`,
    /// using the descriptor registered for its type.
    pub fn to_write_payload(&self, object: &DomainObject) -> Result<Document, TransformError> {
        let descriptor = self.descriptor(&object.resource_type)?;
        Ok(Document::single(write::encode(descriptor, object)?))
    }

    /// Encode a typed model as write payload.
    pub fn model_to_write_payload<T: Resource>(&self, model: &T) -> Result<Document, TransformError> {
        let json = serde_json::to_value(model).map_err(|source| TransformError::Model {
            schema: T::SCHEMA.to_string(),
            source,
        })?;
        self.json_to_write_payload(T::SCHEMA, &json)
    }

    /// Encode the JSON form of a domain object (camelCase fields, related
    /// resources as objects with an `id`) as write payload.
    pub fn json_to_write_payload(&self, schema: &str, json: &Value) -> Result<Document, TransformError> {
        let descriptor = self.descriptor(schema)?;
        let object = write::lift(descriptor, json)?;
        Ok(Document::single(write::encode(descriptor, &object)?))
    }
}

/// Convert a mapped domain object into its typed model
pub fn into_model<T: Resource>(object: &DomainObject) -> Result<T, TransformError> {
    serde_json::from_value(object.to_json()).map_err(|source| TransformError::Model {
        schema: T::SCHEMA.to_string(),
        source,
    })
}
