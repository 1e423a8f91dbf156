use vecino_core::{FeatureFlags, Role};
use vecino_nav::{
    bottom_bar_items, overflow_sections, visible_items, Section, BOTTOM_BAR_MAX, CATALOG,
};

const ROLES: [Role; 2] = [Role::Resident, Role::CommunityAdmin];

fn all_flags_on() -> FeatureFlags {
    CATALOG
        .iter()
        .filter_map(|item| item.feature)
        .map(|key| (key, true))
        .collect()
}

fn paths(items: &[&'static vecino_nav::NavItem]) -> Vec<&'static str> {
    items.iter().map(|i| i.path).collect()
}

#[test]
fn admin_section_requires_super_admin_for_every_role() {
    let flags = all_flags_on();
    for role in ROLES {
        for super_admin in [false, true] {
            let has_admin = visible_items(role, super_admin, &flags)
                .iter()
                .any(|i| i.section == Section::Admin);
            assert_eq!(
                has_admin, super_admin,
                "role={role:?} super_admin={super_admin}"
            );
        }
    }
}

#[test]
fn manage_section_requires_community_admin_role() {
    let flags = all_flags_on();
    for role in ROLES {
        for super_admin in [false, true] {
            let has_manage = visible_items(role, super_admin, &flags)
                .iter()
                .any(|i| i.section == Section::Manage);
            assert_eq!(
                has_manage,
                role == Role::CommunityAdmin,
                "role={role:?} super_admin={super_admin}"
            );
        }
    }
}

#[test]
fn super_admin_resident_sees_main_and_admin_but_not_manage() {
    // Role and super-admin are orthogonal: platform oversight does not
    // grant per-community management.
    let flags = all_flags_on();
    let items = visible_items(Role::Resident, true, &flags);
    assert!(items.iter().any(|i| i.section == Section::Main));
    assert!(items.iter().any(|i| i.section == Section::Admin));
    assert!(!items.iter().any(|i| i.section == Section::Manage));
}

#[test]
fn absent_feature_keys_fail_closed() {
    let empty = FeatureFlags::new();
    for role in ROLES {
        for super_admin in [false, true] {
            for item in visible_items(role, super_admin, &empty) {
                assert!(
                    item.feature.is_none(),
                    "feature-gated item {} leaked with empty flags",
                    item.path
                );
            }
        }
    }
}

#[test]
fn empty_flags_keep_ungated_main_items() {
    let items = visible_items(Role::Resident, false, &FeatureFlags::new());
    let paths = paths(&items);
    assert!(paths.contains(&"/"));
    assert!(paths.contains(&"/neighbors"));
}

#[test]
fn explicitly_disabled_flag_behaves_like_absent() {
    let mut flags = FeatureFlags::new();
    flags.set("events", false);
    let items = visible_items(Role::Resident, false, &flags);
    assert!(!paths(&items).contains(&"/events"));
}

#[test]
fn resolver_is_idempotent_and_order_stable() {
    let flags = all_flags_on();
    for role in ROLES {
        for super_admin in [false, true] {
            let first = paths(&visible_items(role, super_admin, &flags));
            let second = paths(&visible_items(role, super_admin, &flags));
            assert_eq!(first, second);

            // Output order must follow catalog order.
            let mut catalog_positions = first
                .iter()
                .map(|p| CATALOG.iter().position(|i| &i.path == p).unwrap());
            let mut prev = catalog_positions.next().unwrap_or(0);
            for pos in catalog_positions {
                assert!(pos > prev, "catalog order not preserved");
                prev = pos;
            }
        }
    }
}

#[test]
fn bottom_bar_is_a_capped_subset_of_visible() {
    let flags = all_flags_on();
    for role in ROLES {
        for super_admin in [false, true] {
            let visible = paths(&visible_items(role, super_admin, &flags));
            let bottom = bottom_bar_items(role, super_admin, &flags);
            assert!(bottom.len() <= BOTTOM_BAR_MAX);
            for item in &bottom {
                assert!(visible.contains(&item.path));
                assert!(item.bottom_bar);
            }
        }
    }
}

#[test]
fn resident_with_tips_enabled_and_events_disabled() {
    // Scenario from the product: role=resident, no super-admin,
    // flags = { tips: true, events: false }.
    let flags: FeatureFlags = [("tips", true), ("events", false)].into_iter().collect();
    let items = visible_items(Role::Resident, false, &flags);
    let paths = paths(&items);

    assert!(paths.contains(&"/tips"));
    assert!(!paths.contains(&"/events"));
    assert!(items
        .iter()
        .all(|i| i.section != Section::Manage && i.section != Section::Admin));
}

#[test]
fn community_admin_sees_manage_but_not_admin() {
    let flags = all_flags_on();
    let items = visible_items(Role::CommunityAdmin, false, &flags);
    assert!(items.iter().any(|i| i.section == Section::Manage));
    assert!(!items.iter().any(|i| i.section == Section::Admin));
}

#[test]
fn min_role_items_are_hidden_from_residents_and_super_admins() {
    let flags = all_flags_on();

    let admin = paths(&visible_items(Role::CommunityAdmin, false, &flags));
    assert!(admin.contains(&"/manage"));

    let resident = paths(&visible_items(Role::Resident, false, &flags));
    assert!(!resident.contains(&"/manage"));

    // The super-admin flag does not satisfy a min_role requirement.
    let super_resident = paths(&visible_items(Role::Resident, true, &flags));
    assert!(!super_resident.contains(&"/manage"));
}

#[test]
fn overflow_sections_partition_the_visible_set() {
    let flags = all_flags_on();
    for role in ROLES {
        for super_admin in [false, true] {
            let visible = paths(&visible_items(role, super_admin, &flags));
            let sections = overflow_sections(role, super_admin, &flags);

            let mut recombined: Vec<&'static str> = Vec::new();
            recombined.extend(sections.main.iter().map(|i| i.path));
            recombined.extend(sections.manage.iter().map(|i| i.path));
            recombined.extend(sections.admin.iter().map(|i| i.path));
            recombined.sort_unstable();

            let mut expected = visible.clone();
            expected.sort_unstable();
            assert_eq!(recombined, expected);

            assert!(sections.main.iter().all(|i| i.section == Section::Main));
            assert!(sections.manage.iter().all(|i| i.section == Section::Manage));
            assert!(sections.admin.iter().all(|i| i.section == Section::Admin));
        }
    }
}
