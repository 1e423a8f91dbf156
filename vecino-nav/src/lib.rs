//! vecino-nav: role- and feature-gated navigation for vecino.
//!
//! A one-directional, synchronous pipeline: the community switcher
//! ([`session::Session`]) supplies role + feature flags, the resolver
//! ([`resolver::visible_items`]) filters the static [`catalog::CATALOG`],
//! and UI surfaces render the result. No gating logic lives anywhere else.

pub mod catalog;
pub mod resolver;
pub mod session;

pub use catalog::{NavItem, Section, CATALOG};
pub use resolver::{
    bottom_bar_items, overflow_sections, visible_items, NavSections, BOTTOM_BAR_MAX,
};
pub use session::{FlagSource, Session};
