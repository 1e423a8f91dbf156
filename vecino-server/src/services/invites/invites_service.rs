use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;
use vecino_core::context::CommunityId;
use vecino_core::errors::VecinoError;

use crate::services::adapters::store::{CommunityStore, StoreKind};
use crate::services::ServerState;

use super::invites_shared;

/// Invite tokens are plain records: the store adapter is the service,
/// with capabilities narrowed to find/get/create. Acceptance goes through
/// [`accept_invite`], not through the service surface.
pub fn invites_store(state: Arc<ServerState>) -> CommunityStore {
    CommunityStore {
        state,
        store: StoreKind::Invites,
        id_prefix: "invite",
        not_found_prefix: "Invite not found",
        capabilities: invites_shared::crud_capabilities(),
    }
}

/// Register with an invite token: a short, linear sequence of dependent
/// inserts. After the invite lookup succeeds everything is best effort —
/// failures are logged and the flow continues; there is no retry and no
/// compensation.
pub async fn accept_invite(
    state: &ServerState,
    community: &CommunityId,
    token: &str,
    user_id: &str,
) -> Result<Value> {
    // 1. An open invite must carry this token.
    let invite = {
        let invites = state.invites_by_community.read().await;
        invites
            .get(community.as_str())
            .and_then(|records| {
                records.values().find(|v| {
                    v.get("token").and_then(Value::as_str) == Some(token)
                        && v.get("status").and_then(Value::as_str) == Some("open")
                })
            })
            .cloned()
    };
    let Some(invite) = invite else {
        return Err(VecinoError::not_found("Invite not found or already used").into_anyhow());
    };
    let invite_id = invite
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let role = invite
        .get("role")
        .cloned()
        .unwrap_or_else(|| json!("resident"));

    // 2. Make sure the registering user exists.
    {
        let mut users = state.users.write().await;
        users
            .entry(user_id.to_string())
            .or_insert_with(|| json!({ "id": user_id, "superAdmin": false }));
    }

    // 3. The membership itself.
    let membership_id = format!("membership:{}", Uuid::new_v4());
    let record = json!({
        "id": membership_id,
        "communityId": community.as_str(),
        "userId": user_id,
        "role": role,
        "isDefault": false,
        "active": true,
        "invitedBy": invite.get("createdBy").cloned().unwrap_or(Value::Null),
        "createdAt": Utc::now().to_rfc3339(),
    });
    {
        let mut memberships = state.memberships_by_community.write().await;
        memberships
            .entry(community.as_str().to_string())
            .or_default()
            .insert(membership_id.clone(), record.clone());
    }

    // 4. Mark the invite accepted. If the invite vanished in the meantime
    //    the membership stands anyway.
    {
        let mut invites = state.invites_by_community.write().await;
        match invites
            .get_mut(community.as_str())
            .and_then(|records| records.get_mut(&invite_id))
        {
            Some(stored) => {
                if let Some(obj) = stored.as_object_mut() {
                    obj.insert("status".to_string(), json!("accepted"));
                    obj.insert("acceptedBy".to_string(), json!(user_id));
                    obj.insert("acceptedAt".to_string(), json!(Utc::now().to_rfc3339()));
                }
            }
            None => {
                tracing::warn!(
                    invite = %invite_id,
                    community = %community.as_str(),
                    "invite disappeared before it could be marked accepted; membership kept"
                );
            }
        }
    }

    tracing::info!(
        community = %community.as_str(),
        user = user_id,
        membership = %membership_id,
        "invite accepted"
    );

    Ok(record)
}
