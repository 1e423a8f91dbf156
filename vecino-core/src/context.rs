//! Core multi-tenant types for vecino.
//!
//! A "community" is the tenant unit: every record, feature flag, and role
//! is scoped to one community. The [`ActiveContext`] derived from a user's
//! membership is passed into services and hooks so all logic is explicitly
//! tenant-aware.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A community (tenant) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityId(pub String);

impl CommunityId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A user's role within a single community membership.
///
/// Ordered so that `Resident < CommunityAdmin`; use [`Role::at_least`] for
/// "this role or higher" checks. The global super-admin privilege is NOT a
/// role — it lives on [`ActiveContext::super_admin`] and is orthogonal to
/// per-community roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Resident,
    CommunityAdmin,
}

impl Role {
    pub fn at_least(self, min: Role) -> bool {
        self >= min
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Resident => "resident",
            Role::CommunityAdmin => "community_admin",
        }
    }
}

/// Per-community feature toggles.
///
/// Invariant: a key that is absent is disabled. Callers never distinguish
/// "missing" from "off".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags {
    flags: HashMap<String, bool>,
}

impl FeatureFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// The feature gate: enabled only when the key is present and true.
    pub fn enabled(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: impl Into<String>, on: bool) {
        self.flags.insert(key.into(), on);
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for FeatureFlags {
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        Self {
            flags: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A membership identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipId(pub String);

impl MembershipId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }
}

fn default_active() -> bool {
    true
}

/// One (user, community) pairing.
///
/// Memberships are never hard-deleted: when a residency ends the record is
/// deactivated (`active = false`) and kept for history. At most one
/// membership per user carries `is_default`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: MembershipId,
    pub community_id: CommunityId,
    pub user_id: String,
    pub role: Role,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Context carried with every vecino operation.
///
/// Derived, not stored: recomputed from the selected membership (plus the
/// community's feature flags and the user's global super-admin flag) on
/// session load and on every community switch.
#[derive(Debug, Clone)]
pub struct ActiveContext {
    pub community_id: CommunityId,
    pub user_id: Option<String>,
    pub membership_id: Option<MembershipId>,
    pub role: Role,
    pub super_admin: bool,
    pub flags: FeatureFlags,
}

impl ActiveContext {
    /// A guest context for a community: lowest role, no super-admin, empty
    /// flags (everything feature-gated drops out).
    pub fn new<S: Into<String>>(community: S) -> Self {
        Self {
            community_id: CommunityId::new(community),
            user_id: None,
            membership_id: None,
            role: Role::Resident,
            super_admin: false,
            flags: FeatureFlags::new(),
        }
    }

    /// Derive the context for a selected membership.
    pub fn for_membership(membership: &Membership, super_admin: bool, flags: FeatureFlags) -> Self {
        Self {
            community_id: membership.community_id.clone(),
            user_id: Some(membership.user_id.clone()),
            membership_id: Some(membership.id.clone()),
            role: membership.role,
            super_admin,
            flags,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user_id = Some(user.into());
        self
    }

    pub fn is_community_admin(&self) -> bool {
        self.role.at_least(Role::CommunityAdmin)
    }
}
