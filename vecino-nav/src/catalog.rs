//! The navigation catalog: every destination the app can show, in display
//! order, before any role/feature filtering.
//!
//! The catalog is immutable process-wide configuration. Order is
//! significant (it carries navigation priority) and is never re-sorted;
//! the resolver only ever drops entries.

use serde::Serialize;
use vecino_core::Role;

/// Which part of the navigation an item belongs to.
///
/// - `Main`: everyday resident destinations.
/// - `Manage`: per-community administration (community admins).
/// - `Admin`: platform-wide administration (super-admins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Main,
    Manage,
    Admin,
}

/// One catalog entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    /// Icon name when the item is the current destination.
    pub icon: &'static str,
    /// Icon name otherwise.
    pub icon_inactive: &'static str,
    pub section: Section,
    /// Feature key that must be enabled for the item to show.
    /// `None` means always visible, subject to section/role gates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<&'static str>,
    /// Minimum role required, checked against the membership role only —
    /// the super-admin flag never substitutes for it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_role: Option<Role>,
    /// Whether the item may appear on the compact bottom bar.
    pub bottom_bar: bool,
}

pub const CATALOG: &[NavItem] = &[
    NavItem {
        path: "/",
        label: "Home",
        icon: "home-filled",
        icon_inactive: "home-outline",
        section: Section::Main,
        feature: None,
        min_role: None,
        bottom_bar: true,
    },
    NavItem {
        path: "/issues",
        label: "Issues",
        icon: "alert-filled",
        icon_inactive: "alert-outline",
        section: Section::Main,
        feature: Some("issues"),
        min_role: None,
        bottom_bar: true,
    },
    NavItem {
        path: "/events",
        label: "Events",
        icon: "calendar-filled",
        icon_inactive: "calendar-outline",
        section: Section::Main,
        feature: Some("events"),
        min_role: None,
        bottom_bar: true,
    },
    NavItem {
        path: "/bookings",
        label: "Bookings",
        icon: "ticket-filled",
        icon_inactive: "ticket-outline",
        section: Section::Main,
        feature: Some("bookings"),
        min_role: None,
        bottom_bar: true,
    },
    NavItem {
        path: "/tips",
        label: "Tips",
        icon: "book-filled",
        icon_inactive: "book-outline",
        section: Section::Main,
        feature: Some("tips"),
        min_role: None,
        bottom_bar: true,
    },
    NavItem {
        path: "/neighbors",
        label: "Neighbors",
        icon: "people-filled",
        icon_inactive: "people-outline",
        section: Section::Main,
        feature: None,
        min_role: None,
        bottom_bar: false,
    },
    NavItem {
        path: "/manage",
        label: "Manage",
        icon: "settings-filled",
        icon_inactive: "settings-outline",
        section: Section::Main,
        feature: None,
        min_role: Some(Role::CommunityAdmin),
        bottom_bar: true,
    },
    NavItem {
        path: "/manage/residents",
        label: "Residents",
        icon: "people-filled",
        icon_inactive: "people-outline",
        section: Section::Manage,
        feature: None,
        min_role: None,
        bottom_bar: false,
    },
    NavItem {
        path: "/manage/invites",
        label: "Invites",
        icon: "mail-filled",
        icon_inactive: "mail-outline",
        section: Section::Manage,
        feature: None,
        min_role: None,
        bottom_bar: false,
    },
    NavItem {
        path: "/manage/tips",
        label: "Edit tips",
        icon: "pencil-filled",
        icon_inactive: "pencil-outline",
        section: Section::Manage,
        feature: Some("tips"),
        min_role: None,
        bottom_bar: false,
    },
    NavItem {
        path: "/manage/settings",
        label: "Community settings",
        icon: "gear-filled",
        icon_inactive: "gear-outline",
        section: Section::Manage,
        feature: None,
        min_role: None,
        bottom_bar: false,
    },
    NavItem {
        path: "/admin/communities",
        label: "Communities",
        icon: "building-filled",
        icon_inactive: "building-outline",
        section: Section::Admin,
        feature: None,
        min_role: None,
        bottom_bar: false,
    },
    NavItem {
        path: "/admin/platform",
        label: "Platform",
        icon: "globe-filled",
        icon_inactive: "globe-outline",
        section: Section::Admin,
        feature: None,
        min_role: None,
        bottom_bar: false,
    },
];
