//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_entity_path_lookup;
mod in_memory_granular_permission_repository;
mod in_memory_path_permission_resolver;

pub use in_memory_entity_path_lookup::InMemoryEntityPathLookup;
pub use in_memory_granular_permission_repository::InMemoryGranularPermissionRepository;
pub use in_memory_path_permission_resolver::InMemoryPathPermissionResolver;
