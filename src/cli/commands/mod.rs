pub mod auth;
pub mod fetch;
pub mod schema;
pub mod transform;
