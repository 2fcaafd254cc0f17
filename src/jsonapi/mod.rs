pub mod document;
pub mod index;

pub use document::*;
pub use index::ResourceIndex;
