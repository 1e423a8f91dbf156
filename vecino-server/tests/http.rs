use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use vecino_server::build;

fn request(
    method: &str,
    uri: &str,
    user: Option<&str>,
    community: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    if let Some(community) = community {
        builder = builder.header("x-community-id", community);
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn paths(items: &Value) -> Vec<String> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["path"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_ok() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request("GET", "/health", None, None, None))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "ok");
}

#[tokio::test]
async fn navigation_for_a_guest_shows_only_ungated_main_items() {
    let ax = build().unwrap();

    // No community header: unknown community, empty flags, lowest role.
    let res = ax
        .router
        .oneshot(request("GET", "/navigation", None, None, None))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(paths(&body), vec!["/", "/neighbors"]);
}

#[tokio::test]
async fn navigation_for_a_resident_respects_feature_flags() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/navigation",
            Some("ben"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    let paths = paths(&body);

    assert!(paths.contains(&"/tips".to_string()));
    assert!(paths.contains(&"/issues".to_string()));
    // bookings is seeded off in laurel-court.
    assert!(!paths.contains(&"/bookings".to_string()));
    // No management or platform entries for a resident.
    assert!(!paths.iter().any(|p| p.starts_with("/manage")));
    assert!(!paths.iter().any(|p| p.starts_with("/admin")));
}

#[tokio::test]
async fn navigation_for_a_community_admin_includes_manage_entries() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/navigation",
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    let paths = paths(&body);

    assert!(paths.contains(&"/manage".to_string()));
    assert!(paths.contains(&"/manage/residents".to_string()));
    assert!(paths.contains(&"/manage/invites".to_string()));
    assert!(paths.contains(&"/manage/tips".to_string()));
    assert!(!paths.iter().any(|p| p.starts_with("/admin")));
}

#[tokio::test]
async fn navigation_for_a_super_admin_resident_shows_platform_but_not_manage() {
    let ax = build().unwrap();

    // sofia is a platform super-admin but only a resident of the community.
    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/navigation",
            Some("sofia"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    let paths = paths(&body);

    assert!(paths.contains(&"/admin/communities".to_string()));
    assert!(paths.contains(&"/admin/platform".to_string()));
    assert!(!paths.iter().any(|p| p.starts_with("/manage")));
}

#[tokio::test]
async fn bottom_bar_is_a_capped_subset_of_the_full_surface() {
    let ax = build().unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "GET",
            "/navigation",
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let full = paths(&json_body(res).await);

    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/navigation?surface=bottom",
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    let bottom = paths(&body);

    assert!(bottom.len() <= 4);
    for p in &bottom {
        assert!(full.contains(p));
    }
}

#[tokio::test]
async fn overflow_surface_partitions_by_section() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/navigation?surface=overflow",
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    let sections = &body.as_array().unwrap()[0];

    assert!(sections["main"].as_array().unwrap().len() > 0);
    let manage: Vec<&str> = sections["manage"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["path"].as_str().unwrap())
        .collect();
    assert!(manage.contains(&"/manage/residents"));
    assert_eq!(sections["admin"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_navigation_surface_is_a_bad_request() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/navigation?surface=sideways",
            Some("ben"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
    let body = json_body(res).await;
    assert_eq!(body["name"], "BadRequest");
}

#[tokio::test]
async fn residents_cannot_mutate_tips() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "POST",
            "/tips",
            Some("ben"),
            Some("laurel-court"),
            Some(json!({"title": "Recycling", "categoryId": "category:x"})),
        ))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 403);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Forbidden");
    assert_eq!(body["className"], "forbidden");
}

#[tokio::test]
async fn anonymous_mutations_are_not_authenticated() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "POST",
            "/tips",
            None,
            Some("laurel-court"),
            Some(json!({"title": "Recycling", "categoryId": "category:x"})),
        ))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 401);
    let body = json_body(res).await;
    assert_eq!(body["name"], "NotAuthenticated");
}

#[tokio::test]
async fn category_create_requires_a_label() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "POST",
            "/tip-categories",
            Some("ana"),
            Some("laurel-court"),
            Some(json!({})),
        ))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Unprocessable");
    assert_eq!(body["errors"]["label"][0], "label must not be empty");
}

#[tokio::test]
async fn tips_must_reference_an_existing_category() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "POST",
            "/tips",
            Some("ana"),
            Some("laurel-court"),
            Some(json!({"title": "Compost", "categoryId": "category:nope"})),
        ))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["errors"]["categoryId"][0], "category not found");
}

#[tokio::test]
async fn tips_are_ordered_by_sort_key_within_a_category() {
    let ax = build().unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/tip-categories",
            Some("ana"),
            Some("laurel-court"),
            Some(json!({"label": "Waste"})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let category = json_body(res).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    for (title, sort_order) in [("Second", 2), ("First", 1)] {
        let res = ax
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/tips",
                Some("ana"),
                Some("laurel-court"),
                Some(json!({
                    "title": title,
                    "categoryId": category_id,
                    "sortOrder": sort_order,
                })),
            ))
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
    }

    let res = ax
        .router
        .oneshot(request(
            "GET",
            &format!("/tips?categoryId={category_id}"),
            Some("ben"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second"]);

    // Tips created without content start from the configured empty doc.
    assert_eq!(body[0]["content"]["type"], "doc");
}

#[tokio::test]
async fn removing_a_category_cascades_over_its_tips() {
    let ax = build().unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/tip-categories",
            Some("ana"),
            Some("laurel-court"),
            Some(json!({"label": "Gardening"})),
        ))
        .await
        .unwrap();
    let category = json_body(res).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    for title in ["Mulch", "Prune"] {
        let res = ax
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/tips",
                Some("ana"),
                Some("laurel-court"),
                Some(json!({"title": title, "categoryId": category_id})),
            ))
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
    }

    // The affected count is reported before the destructive confirm.
    let res = ax
        .router
        .clone()
        .oneshot(request(
            "GET",
            &format!("/tip-categories/{category_id}"),
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["tipCount"], 2);

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/tip-categories/{category_id}"),
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let removed = json_body(res).await;
    assert_eq!(removed["removedTips"], 2);

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "GET",
            &format!("/tips?categoryId={category_id}"),
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(json_body(res).await.as_array().unwrap().len(), 0);

    let res = ax
        .router
        .oneshot(request(
            "GET",
            &format!("/tip-categories/{category_id}"),
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn tips_are_isolated_by_community() {
    let ax = build().unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/tip-categories",
            Some("ana"),
            Some("laurel-court"),
            Some(json!({"label": "Laurel only"})),
        ))
        .await
        .unwrap();
    let category = json_body(res).await;
    let category_id = category["id"].as_str().unwrap().to_string();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/tips",
            Some("ana"),
            Some("laurel-court"),
            Some(json!({"title": "Local", "categoryId": category_id})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = ax
        .router
        .oneshot(request("GET", "/tips", Some("ana"), Some("cedar-yard"), None))
        .await
        .unwrap();
    assert_eq!(json_body(res).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn memberships_cannot_be_hard_deleted() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "DELETE",
            "/memberships/membership:ben-laurel",
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 405);
    let body = json_body(res).await;
    assert_eq!(body["name"], "MethodNotAllowed");
}

#[tokio::test]
async fn residents_only_see_their_own_membership_records() {
    let ax = build().unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "GET",
            "/memberships",
            Some("ben"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["userId"], "ben");

    // The community admin sees the whole roster.
    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/memberships",
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn session_applies_the_default_selection_and_keeps_history() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request("GET", "/session", Some("ben"), None, None))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;

    // Ben's ended Cedar Yard residency is listed but never selected.
    assert_eq!(body["memberships"].as_array().unwrap().len(), 2);
    assert_eq!(body["activeMembershipId"], "membership:ben-laurel");
    assert_eq!(body["superAdmin"], false);
    assert_eq!(body["context"]["communityId"], "laurel-court");
    assert_eq!(body["context"]["role"], "resident");
    assert_eq!(body["context"]["superAdmin"], false);
    assert_eq!(body["context"]["flags"]["tips"], true);
}

#[tokio::test]
async fn selecting_a_stale_membership_is_a_noop() {
    let ax = build().unwrap();

    for bad_id in ["membership:ben-cedar", "membership:gone"] {
        let res = ax
            .router
            .clone()
            .oneshot(request(
                "POST",
                "/session/select",
                Some("ben"),
                None,
                Some(json!({"membershipId": bad_id})),
            ))
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body = json_body(res).await;
        assert_eq!(body["selected"], false);
        assert_eq!(body["activeMembershipId"], "membership:ben-laurel");
    }
}

#[tokio::test]
async fn selecting_another_membership_rederives_the_context() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "POST",
            "/session/select",
            Some("ana"),
            None,
            Some(json!({"membershipId": "membership:ana-cedar"})),
        ))
        .await
        .unwrap();
    let body = json_body(res).await;

    assert_eq!(body["selected"], true);
    assert_eq!(body["activeMembershipId"], "membership:ana-cedar");
    assert_eq!(body["context"]["communityId"], "cedar-yard");
    assert_eq!(body["context"]["role"], "community_admin");
    // cedar-yard never enabled issues: absent flags read as disabled.
    assert!(body["context"]["flags"].get("issues").is_none());
}

#[tokio::test]
async fn moving_the_default_flag_clears_the_previous_default() {
    let ax = build().unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "PATCH",
            "/memberships/membership:ana-cedar",
            Some("ana"),
            Some("cedar-yard"),
            Some(json!({"isDefault": true})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = ax
        .router
        .clone()
        .oneshot(request("GET", "/session", Some("ana"), None, None))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["activeMembershipId"], "membership:ana-cedar");

    // The old default in laurel-court was cleared, best effort.
    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/memberships?userId=ana",
            Some("ana"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    let body = json_body(res).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["isDefault"], false);
}

#[tokio::test]
async fn joining_with_an_invite_creates_a_membership_once() {
    let ax = build().unwrap();

    let res = ax
        .router
        .clone()
        .oneshot(request(
            "POST",
            "/join",
            Some("diego"),
            None,
            Some(json!({"communityId": "cedar-yard", "token": "cedar-welcome"})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let membership = json_body(res).await;
    assert_eq!(membership["userId"], "diego");
    assert_eq!(membership["communityId"], "cedar-yard");
    assert_eq!(membership["role"], "resident");

    let res = ax
        .router
        .clone()
        .oneshot(request("GET", "/session", Some("diego"), None, None))
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body["context"]["communityId"], "cedar-yard");

    // The token was consumed; a second registration finds nothing.
    let res = ax
        .router
        .oneshot(request(
            "POST",
            "/join",
            Some("elena"),
            None,
            Some(json!({"communityId": "cedar-yard", "token": "cedar-welcome"})),
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}

#[tokio::test]
async fn invite_listing_is_admin_only() {
    let ax = build().unwrap();

    // Ben's cedar-yard membership is deactivated, so no role there.
    let res = ax
        .router
        .clone()
        .oneshot(request(
            "GET",
            "/invites",
            Some("ben"),
            Some("cedar-yard"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 403);

    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/invites",
            Some("ana"),
            Some("cedar-yard"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn service_responses_carry_a_request_id() {
    let ax = build().unwrap();

    let res = ax
        .router
        .oneshot(request(
            "GET",
            "/navigation",
            Some("ben"),
            Some("laurel-court"),
            None,
        ))
        .await
        .unwrap();
    assert!(res.headers().get("x-request-id").is_some());
}
