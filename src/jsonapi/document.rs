use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A JSON:API resource identifier: `{ type, id? }`.
/// An identifier without id points to an entity that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: Option<String>) -> Self {
        Self { id, resource_type: resource_type.into() }
    }
}

/// Linkage of a relationship: one identifier or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// A relationship entry: `{ data: identifier | identifier[] | null }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Relationship {
    pub data: Option<RelationshipData>,
}

impl Relationship {
    pub fn one(identifier: Option<ResourceIdentifier>) -> Self {
        Self { data: identifier.map(RelationshipData::One) }
    }

    pub fn many(identifiers: Vec<ResourceIdentifier>) -> Self {
        Self { data: Some(RelationshipData::Many(identifiers)) }
    }

    /// All identifiers of this relationship in wire order.
    pub fn identifiers(&self) -> Vec<&ResourceIdentifier> {
        match &self.data {
            None => Vec::new(),
            Some(RelationshipData::One(identifier)) => vec![identifier],
            Some(RelationshipData::Many(identifiers)) => identifiers.iter().collect(),
        }
    }
}

/// One typed, identified entity within a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<BTreeMap<String, Relationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl ResourceObject {
    pub fn new(resource_type: impl Into<String>, id: Option<String>) -> Self {
        Self {
            id,
            resource_type: resource_type.into(),
            attributes: Map::new(),
            relationships: None,
            meta: None,
        }
    }

    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.resource_type.clone(), self.id.clone())
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.as_ref()?.get(name)
    }
}

/// Primary data: a single resource (detail endpoints) or a list (list endpoints).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(Box<ResourceObject>),
    Many(Vec<ResourceObject>),
}

impl PrimaryData {
    pub fn is_collection(&self) -> bool {
        matches!(self, PrimaryData::Many(_))
    }

    pub fn resources(&self) -> Vec<&ResourceObject> {
        match self {
            PrimaryData::One(resource) => vec![resource.as_ref()],
            PrimaryData::Many(resources) => resources.iter().collect(),
        }
    }

    pub fn resources_mut(&mut self) -> Vec<&mut ResourceObject> {
        match self {
            PrimaryData::One(resource) => vec![resource.as_mut()],
            PrimaryData::Many(resources) => resources.iter_mut().collect(),
        }
    }
}

/// Document level pagination block. The backend sends `null` for offset and
/// limit when no pagination was requested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    pub pointer: String,
}

/// A JSON:API error object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

/// Pagination values with every missing field defaulted to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMeta {
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
}

/// The JSON:API envelope, used for responses and for write payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub data: PrimaryData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<ResourceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorObject>>,
}

impl Document {
    /// A document with a single primary resource and nothing else.
    pub fn single(resource: ResourceObject) -> Self {
        Self {
            meta: None,
            data: PrimaryData::One(Box::new(resource)),
            included: Vec::new(),
            errors: None,
        }
    }

    pub fn collection(resources: Vec<ResourceObject>) -> Self {
        Self {
            meta: None,
            data: PrimaryData::Many(resources),
            included: Vec::new(),
            errors: None,
        }
    }

    /// The primary resource, when data is not a list.
    pub fn resource(&self) -> Option<&ResourceObject> {
        match &self.data {
            PrimaryData::One(resource) => Some(resource),
            PrimaryData::Many(_) => None,
        }
    }

    /// The primary resources, when data is a list.
    pub fn resources(&self) -> Option<&[ResourceObject]> {
        match &self.data {
            PrimaryData::One(_) => None,
            PrimaryData::Many(resources) => Some(resources),
        }
    }

    pub fn pagination(&self) -> PageMeta {
        match &self.meta {
            Some(meta) => PageMeta {
                count: meta.count,
                offset: meta.offset.unwrap_or(0),
                limit: meta.limit.unwrap_or(0),
            },
            None => PageMeta::default(),
        }
    }

    /// Merge another document into this one. Data becomes a list when it
    /// wasn't one yet, included resources are unioned by (type, id).
    /// Meta is not merged.
    pub fn merge(&mut self, other: Document) {
        let mut resources = match std::mem::replace(&mut self.data, PrimaryData::Many(Vec::new())) {
            PrimaryData::One(resource) => vec![*resource],
            PrimaryData::Many(resources) => resources,
        };
        match other.data {
            PrimaryData::One(resource) => resources.push(*resource),
            PrimaryData::Many(more) => resources.extend(more),
        }
        self.data = PrimaryData::Many(resources);

        for resource in other.included {
            let duplicate = self.included.iter().any(|existing| {
                existing.resource_type == resource.resource_type && existing.id == resource.id
            });
            if !duplicate {
                self.included.push(resource);
            }
        }
    }
}
