//! The community switcher: which of a user's memberships is active, and
//! the [`ActiveContext`] derived from it.
//!
//! Two states: no active membership (empty list, or nothing selectable)
//! and active membership selected. Selecting an unknown or deactivated
//! membership id is a silent no-op — stale ids show up routinely right
//! after a membership list refresh and must not surface as errors.

use vecino_core::{ActiveContext, CommunityId, FeatureFlags, Membership, MembershipId};

/// Per-community feature-flag provider.
///
/// Implemented by whatever owns flag data (a store snapshot, a test map);
/// the switcher itself never fetches anything.
pub trait FlagSource {
    fn flags_for(&self, community: &CommunityId) -> FeatureFlags;
}

#[derive(Debug, Clone)]
pub struct Session {
    memberships: Vec<Membership>,
    super_admin: bool,
    active: Option<MembershipId>,
}

impl Session {
    /// Build a session and apply the default selection: the active
    /// membership flagged default, else the first active membership in
    /// list order, else no selection.
    ///
    /// Deactivated memberships stay in the list (residency history) but
    /// are never selected.
    pub fn new(memberships: Vec<Membership>, super_admin: bool) -> Self {
        let active = default_selection(&memberships);
        Self {
            memberships,
            super_admin,
            active,
        }
    }

    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    pub fn super_admin(&self) -> bool {
        self.super_admin
    }

    pub fn active_membership(&self) -> Option<&Membership> {
        let id = self.active.as_ref()?;
        self.memberships.iter().find(|m| &m.id == id)
    }

    /// Switch to the given membership.
    ///
    /// Returns `true` when the selection was applied (callers re-derive
    /// dependent state: navigation, theming, data fetches). An unknown or
    /// deactivated id leaves the selection unchanged and returns `false`.
    pub fn select(&mut self, id: &MembershipId) -> bool {
        let selectable = self
            .memberships
            .iter()
            .any(|m| &m.id == id && m.active);
        if !selectable {
            return false;
        }
        self.active = Some(id.clone());
        true
    }

    /// Replace the membership list after a refresh. The current selection
    /// survives when its id is still present and active; otherwise the
    /// default selection is re-applied.
    pub fn set_memberships(&mut self, memberships: Vec<Membership>) {
        self.memberships = memberships;
        let survives = self.active.as_ref().is_some_and(|id| {
            self.memberships.iter().any(|m| &m.id == id && m.active)
        });
        if !survives {
            self.active = default_selection(&self.memberships);
        }
    }

    /// Re-derive the [`ActiveContext`] for the current selection.
    ///
    /// Synchronous and side-effect free; `None` in the
    /// no-active-membership state.
    pub fn context(&self, flags: &dyn FlagSource) -> Option<ActiveContext> {
        let membership = self.active_membership()?;
        Some(ActiveContext::for_membership(
            membership,
            self.super_admin,
            flags.flags_for(&membership.community_id),
        ))
    }
}

fn default_selection(memberships: &[Membership]) -> Option<MembershipId> {
    memberships
        .iter()
        .find(|m| m.active && m.is_default)
        .or_else(|| memberships.iter().find(|m| m.active))
        .map(|m| m.id.clone())
}
