/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

use crate::jsonapi::PageMeta;

/// Write operations a payload can be used for.
/// The presence of an id on the primary resource is the only signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    pub fn for_id(id: Option<&str>) -> Self {
        match id {
            Some(_) => Operation::Update,
            None => Operation::Create,
        }
    }
}

/// A page of mapped items, produced when a document's data is a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            meta: self.meta,
            items: self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?,
        })
    }
}
