pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod jsonapi;
pub mod models;
pub mod schema;
pub mod transform;
pub mod types;

pub use client::{ApiClient, ClientError, JsonApiTransport, QueryParams, RefreshGuard, ResourceApi};
pub use error::TransformError;
pub use jsonapi::{Document, ResourceIndex};
pub use schema::{SchemaRegistry, ValidationError};
pub use transform::{DomainObject, DomainValue, Transformed, Transformer};
