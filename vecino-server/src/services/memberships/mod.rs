pub mod memberships_hooks;
pub mod memberships_service;
pub mod memberships_shared;

pub use memberships_service::MembershipsService;
