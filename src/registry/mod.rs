//! Environment records and their durable registry.

pub mod record;
pub mod store;

pub use record::{validate_name, EnvironmentRecord};
pub use store::{Registry, RegistryStore, REGISTRY_ENV};
