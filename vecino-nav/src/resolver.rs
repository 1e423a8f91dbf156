//! The visibility resolver: pure functions from (role, super-admin flag,
//! feature flags) to the subset of the catalog a user may see.
//!
//! UI surfaces consume the output as-is and never re-implement gating.

use serde::Serialize;
use vecino_core::{FeatureFlags, Role};

use crate::catalog::{NavItem, Section, CATALOG};

/// How many items the compact bottom bar shows. Everything visible beyond
/// the cap surfaces in the overflow sheet instead.
pub const BOTTOM_BAR_MAX: usize = 4;

fn item_visible(item: &NavItem, role: Role, super_admin: bool, flags: &FeatureFlags) -> bool {
    match item.section {
        // Platform oversight: super-admins only, regardless of role.
        Section::Admin if !super_admin => return false,
        // Per-community management: community admins only. The super-admin
        // flag does not substitute — platform oversight and per-community
        // management are kept separate.
        Section::Manage if !role.at_least(Role::CommunityAdmin) => return false,
        _ => {}
    }

    if let Some(min) = item.min_role {
        if !role.at_least(min) {
            return false;
        }
    }

    if let Some(feature) = item.feature {
        if !flags.enabled(feature) {
            return false;
        }
    }

    true
}

/// The ordered subset of the catalog visible to a user.
///
/// Catalog order is preserved; nothing is re-sorted.
pub fn visible_items(role: Role, super_admin: bool, flags: &FeatureFlags) -> Vec<&'static NavItem> {
    CATALOG
        .iter()
        .filter(|item| item_visible(item, role, super_admin, flags))
        .collect()
}

/// The compact-surface subset: visible items flagged bottom-bar eligible,
/// capped at [`BOTTOM_BAR_MAX`]. Always a subset of [`visible_items`].
pub fn bottom_bar_items(
    role: Role,
    super_admin: bool,
    flags: &FeatureFlags,
) -> Vec<&'static NavItem> {
    let mut items: Vec<&'static NavItem> = visible_items(role, super_admin, flags)
        .into_iter()
        .filter(|item| item.bottom_bar)
        .collect();
    items.truncate(BOTTOM_BAR_MAX);
    items
}

/// The full visible set partitioned by section, for the overflow ("more")
/// sheet and sidebar-style surfaces.
#[derive(Debug, Default, Serialize)]
pub struct NavSections {
    pub main: Vec<&'static NavItem>,
    pub manage: Vec<&'static NavItem>,
    pub admin: Vec<&'static NavItem>,
}

pub fn overflow_sections(role: Role, super_admin: bool, flags: &FeatureFlags) -> NavSections {
    let mut sections = NavSections::default();
    for item in visible_items(role, super_admin, flags) {
        match item.section {
            Section::Main => sections.main.push(item),
            Section::Manage => sections.manage.push(item),
            Section::Admin => sections.admin.push(item),
        }
    }
    sections
}
