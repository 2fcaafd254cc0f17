//! Typed domain models for the kwai resource kinds.
//!
//! Serde names match the domain fields of the descriptors (camelCase), so a
//! mapped `DomainObject` deserializes straight into them.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A typed model bound to the descriptor it is read with and written as.
pub trait Resource: Serialize + DeserializeOwned {
    /// Name of the registered descriptor
    const SCHEMA: &'static str;

    fn id(&self) -> Option<&str>;

    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

macro_rules! impl_resource {
    ($model:ty, $schema:literal) => {
        impl $crate::models::Resource for $model {
            const SCHEMA: &'static str = $schema;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }
        }
    };
}

pub(crate) use impl_resource;

pub mod auth;
pub mod club;
pub mod portal;
pub mod team;
pub mod training;

pub use auth::UserInvitation;
pub use club::{Contact, Country, Member, Person};
pub use portal::{Application, NewsItem, Page, Text};
pub use team::{License, Team, TeamMember};
pub use training::{Named, Training, TrainingCoach, TrainingDefinition, TrainingEvent};
