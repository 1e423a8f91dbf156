use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use vecino_core::context::ActiveContext;
use vecino_core::{ServiceCapabilities, VecinoService};

use crate::services::adapters::store::{CommunityStore, StoreKind};
use crate::services::{Params, ServerState};

use super::memberships_shared;

/// Membership records for the active community.
///
/// Capabilities exclude `Remove`: residency history is never hard-deleted.
/// A residency ends by patching `active: false`.
pub struct MembershipsService {
    pub adapter: CommunityStore,
}

impl MembershipsService {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self {
            adapter: CommunityStore {
                state,
                store: StoreKind::Memberships,
                id_prefix: "membership",
                not_found_prefix: "Membership not found",
                capabilities: memberships_shared::crud_capabilities(),
            },
        }
    }

    /// Moving the default flag clears the user's other defaults. Best
    /// effort: the new default stands even if clearing fails.
    async fn settle_default_flag(&self, record: &Value) {
        let is_default = record
            .get("isDefault")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !is_default {
            return;
        }
        let (Some(user_id), Some(id)) = (
            record.get("userId").and_then(Value::as_str),
            record.get("id").and_then(Value::as_str),
        ) else {
            return;
        };
        self.adapter.state.clear_other_defaults(user_id, id).await;
    }
}

#[async_trait]
impl VecinoService<Value, Params> for MembershipsService {
    fn capabilities(&self) -> ServiceCapabilities {
        memberships_shared::crud_capabilities()
    }

    /// Admins see the community roster (optionally filtered by `userId`);
    /// everyone else sees only their own records.
    async fn find(&self, ctx: &ActiveContext, params: Params) -> Result<Vec<Value>> {
        let filter = params.query.get("userId").cloned();
        let mut records = self.adapter._find(ctx, params).await?;

        if ctx.is_community_admin() {
            if let Some(user) = filter {
                records.retain(|v| v.get("userId").and_then(Value::as_str) == Some(user.as_str()));
            }
        } else {
            match ctx.user_id.as_deref() {
                Some(user) => {
                    records.retain(|v| v.get("userId").and_then(Value::as_str) == Some(user))
                }
                None => records.clear(),
            }
        }

        records.sort_by(|a, b| {
            let key = |v: &Value| {
                v.get("id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            key(a).cmp(&key(b))
        });
        Ok(records)
    }

    async fn get(&self, ctx: &ActiveContext, id: &str, params: Params) -> Result<Value> {
        self.adapter._get(ctx, id, params).await
    }

    async fn create(&self, ctx: &ActiveContext, data: Value, params: Params) -> Result<Value> {
        let created = self.adapter._create(ctx, data, params).await?;
        self.settle_default_flag(&created).await;
        Ok(created)
    }

    async fn patch(
        &self,
        ctx: &ActiveContext,
        id: Option<&str>,
        data: Value,
        params: Params,
    ) -> Result<Value> {
        let patched = self.adapter._patch(ctx, id, data, params).await?;
        self.settle_default_flag(&patched).await;
        Ok(patched)
    }
}
