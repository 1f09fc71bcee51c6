//! Domain types for granular permissions.

#![forbid(unsafe_code)]

mod granular_grant;
mod permission_context;
mod presentation;
mod reference;

pub use granular_grant::{
    COMPOUND_PERMISSION_SEPARATOR, CompoundPermission, GranularGrant, RawGrant,
};
pub use permission_context::PermissionContext;
pub use presentation::{EntityPermissionModel, PermissionPresentationModel, PropertyPermissionModel};
pub use reference::ReferenceById;
