//! Notification policy configuration

pub mod loader;
pub mod schema;

pub use loader::PolicyLoader;
pub use schema::{PolicyConfig, PolicyOverrides};
