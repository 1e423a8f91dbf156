use std::collections::HashMap;

use vecino_core::{CommunityId, FeatureFlags, Membership, MembershipId, Role};
use vecino_nav::{FlagSource, Session};

struct FlagTable(HashMap<String, FeatureFlags>);

impl FlagSource for FlagTable {
    fn flags_for(&self, community: &CommunityId) -> FeatureFlags {
        self.0.get(community.as_str()).cloned().unwrap_or_default()
    }
}

fn membership(id: &str, community: &str, role: Role, is_default: bool, active: bool) -> Membership {
    Membership {
        id: MembershipId::new(id),
        community_id: CommunityId::new(community),
        user_id: "ana".to_string(),
        role,
        is_default,
        active,
    }
}

fn flags() -> FlagTable {
    let mut map = HashMap::new();
    map.insert(
        "laurel-court".to_string(),
        [("tips", true), ("issues", true)].into_iter().collect(),
    );
    map.insert(
        "cedar-yard".to_string(),
        [("tips", true)].into_iter().collect(),
    );
    FlagTable(map)
}

#[test]
fn default_selection_prefers_the_default_flag() {
    let session = Session::new(
        vec![
            membership("m1", "laurel-court", Role::Resident, false, true),
            membership("m2", "cedar-yard", Role::CommunityAdmin, true, true),
        ],
        false,
    );
    assert_eq!(
        session.active_membership().map(|m| m.id.clone()),
        Some(MembershipId::new("m2"))
    );
}

#[test]
fn default_selection_falls_back_to_first_active() {
    let session = Session::new(
        vec![
            membership("m1", "laurel-court", Role::Resident, false, false),
            membership("m2", "cedar-yard", Role::Resident, false, true),
            membership("m3", "cedar-yard", Role::Resident, false, true),
        ],
        false,
    );
    assert_eq!(
        session.active_membership().map(|m| m.id.clone()),
        Some(MembershipId::new("m2"))
    );
}

#[test]
fn empty_list_means_no_active_membership() {
    let session = Session::new(vec![], false);
    assert!(session.active_membership().is_none());
    assert!(session.context(&flags()).is_none());
}

#[test]
fn selecting_an_unknown_id_is_a_silent_noop() {
    let mut session = Session::new(
        vec![membership("m1", "laurel-court", Role::Resident, true, true)],
        false,
    );
    let switched = session.select(&MembershipId::new("gone"));
    assert!(!switched);
    assert_eq!(
        session.active_membership().map(|m| m.id.clone()),
        Some(MembershipId::new("m1"))
    );
}

#[test]
fn selecting_a_deactivated_membership_is_a_silent_noop() {
    let mut session = Session::new(
        vec![
            membership("m1", "laurel-court", Role::Resident, true, true),
            membership("m2", "cedar-yard", Role::Resident, false, false),
        ],
        false,
    );
    assert!(!session.select(&MembershipId::new("m2")));
    assert_eq!(
        session.active_membership().map(|m| m.id.clone()),
        Some(MembershipId::new("m1"))
    );
}

#[test]
fn switching_rederives_role_and_flags() {
    let mut session = Session::new(
        vec![
            membership("m1", "laurel-court", Role::Resident, true, true),
            membership("m2", "cedar-yard", Role::CommunityAdmin, false, true),
        ],
        false,
    );
    let table = flags();

    let ctx = session.context(&table).unwrap();
    assert_eq!(ctx.community_id, CommunityId::new("laurel-court"));
    assert_eq!(ctx.role, Role::Resident);
    assert!(ctx.flags.enabled("issues"));

    assert!(session.select(&MembershipId::new("m2")));
    let ctx = session.context(&table).unwrap();
    assert_eq!(ctx.community_id, CommunityId::new("cedar-yard"));
    assert_eq!(ctx.role, Role::CommunityAdmin);
    assert_eq!(ctx.membership_id, Some(MembershipId::new("m2")));
    // cedar-yard never enabled issues: absent key reads as disabled.
    assert!(!ctx.flags.enabled("issues"));
}

#[test]
fn super_admin_flag_is_carried_into_the_context() {
    let session = Session::new(
        vec![membership("m1", "laurel-court", Role::Resident, true, true)],
        true,
    );
    let ctx = session.context(&flags()).unwrap();
    assert!(ctx.super_admin);
    assert_eq!(ctx.role, Role::Resident);
}

#[test]
fn refresh_keeps_a_surviving_selection() {
    let mut session = Session::new(
        vec![
            membership("m1", "laurel-court", Role::Resident, true, true),
            membership("m2", "cedar-yard", Role::Resident, false, true),
        ],
        false,
    );
    assert!(session.select(&MembershipId::new("m2")));

    session.set_memberships(vec![
        membership("m1", "laurel-court", Role::Resident, true, true),
        membership("m2", "cedar-yard", Role::CommunityAdmin, false, true),
    ]);
    assert_eq!(
        session.active_membership().map(|m| m.id.clone()),
        Some(MembershipId::new("m2"))
    );
}

#[test]
fn refresh_redefaults_when_the_selection_disappears() {
    let mut session = Session::new(
        vec![
            membership("m1", "laurel-court", Role::Resident, true, true),
            membership("m2", "cedar-yard", Role::Resident, false, true),
        ],
        false,
    );
    assert!(session.select(&MembershipId::new("m2")));

    // m2's residency ended; the record stays but is deactivated.
    session.set_memberships(vec![
        membership("m1", "laurel-court", Role::Resident, true, true),
        membership("m2", "cedar-yard", Role::Resident, false, false),
    ]);
    assert_eq!(
        session.active_membership().map(|m| m.id.clone()),
        Some(MembershipId::new("m1"))
    );
}
