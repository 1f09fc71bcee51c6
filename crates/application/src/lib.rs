//! Application services and ports.

#![forbid(unsafe_code)]

mod granular_permission_service;
mod permission_mapper_registry;
mod permission_mappers;
mod permission_ports;

pub use granular_permission_service::GranularPermissionService;
pub use permission_mapper_registry::PermissionMapperRegistry;
pub use permission_mappers::{
    DocumentPermissionMapper, DocumentPropertyValuePermissionMapper, DocumentTypePermissionMapper,
    DocumentTypePropertyPermissionMapper, ElementPermissionMapper, PermissionAggregator,
    PermissionMapper,
};
pub use permission_ports::{
    EffectivePermissionSet, EntityLookup, EntityPathEntry, GranularPermissionRepository,
    PermissionResolver, UserGroupGranularPermission,
};
