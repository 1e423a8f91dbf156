use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use vecino_axum::VecinoAxumError;
use vecino_core::errors::VecinoError;
use vecino_core::{CommunityId, MembershipId};
use vecino_nav::Session;

use crate::services::invites::accept_invite;
use crate::services::{CommunityFlagTable, ServerState};

fn require_user(headers: &HeaderMap) -> Result<String, VecinoAxumError> {
    headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            VecinoError::not_authenticated("Sign in to load a session")
                .into_anyhow()
                .into()
        })
}

fn session_payload(session: &Session, flags: &CommunityFlagTable) -> Value {
    let context = session.context(flags).map(|ctx| {
        json!({
            "communityId": ctx.community_id.as_str(),
            "membershipId": ctx.membership_id.as_ref().map(|m| m.0.clone()),
            "role": ctx.role.as_str(),
            "superAdmin": ctx.super_admin,
            "flags": ctx.flags,
        })
    });

    json!({
        "memberships": session.memberships(),
        "activeMembershipId": session.active_membership().map(|m| m.id.0.clone()),
        "superAdmin": session.super_admin(),
        "context": context,
    })
}

async fn load_session(state: &ServerState, user_id: &str) -> (Session, CommunityFlagTable) {
    let memberships = state.memberships_for_user(user_id).await;
    let super_admin = state.is_super_admin(user_id).await;
    let flags = state.flag_table().await;
    (Session::new(memberships, super_admin), flags)
}

/// `GET /session` — the caller's membership list, the default-selected
/// membership, and the context derived from it.
async fn current_session(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, VecinoAxumError> {
    let user_id = require_user(&headers)?;
    let (session, flags) = load_session(&state, &user_id).await;
    Ok(Json(session_payload(&session, &flags)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectBody {
    membership_id: String,
}

/// `POST /session/select` — switch to a membership. An unknown or
/// deactivated id is a no-op, not an error: the previous context is
/// returned with `selected: false`.
async fn select_membership(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<SelectBody>,
) -> Result<Json<Value>, VecinoAxumError> {
    let user_id = require_user(&headers)?;
    let (mut session, flags) = load_session(&state, &user_id).await;

    let selected = session.select(&MembershipId::new(body.membership_id));

    let mut payload = session_payload(&session, &flags);
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("selected".to_string(), json!(selected));
    }
    Ok(Json(payload))
}

pub fn session_router(state: Arc<ServerState>) -> Router<()> {
    Router::new()
        .route("/", get(current_session))
        .route("/select", post(select_membership))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinBody {
    community_id: String,
    token: String,
}

/// `POST /join` — register into a community with an invite token.
async fn join_community(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(body): Json<JoinBody>,
) -> Result<Json<Value>, VecinoAxumError> {
    let user_id = require_user(&headers)?;
    let community = CommunityId::new(body.community_id);
    let membership = accept_invite(&state, &community, &body.token, &user_id).await?;
    Ok(Json(membership))
}

pub fn join_router(state: Arc<ServerState>) -> Router<()> {
    Router::new().route("/", post(join_community)).with_state(state)
}
