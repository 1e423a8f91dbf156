pub mod invites_hooks;
pub mod invites_service;
pub mod invites_shared;

pub use invites_service::{accept_invite, invites_store};
