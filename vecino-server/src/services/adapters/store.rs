use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use uuid::Uuid;
use vecino_core::errors::VecinoError;
use vecino_core::{ActiveContext, ServiceCapabilities};

use crate::services::{Params, ServerState, TenantRecords};

#[derive(Clone, Copy)]
pub enum StoreKind {
    TipCategories,
    Tips,
    Memberships,
    Invites,
}

/// Generic per-community record store: every collection keeps records in
/// a map keyed by community id, so one community never sees another's
/// rows.
pub struct CommunityStore {
    pub state: Arc<ServerState>,
    pub store: StoreKind,
    pub id_prefix: &'static str,
    pub not_found_prefix: &'static str,
    pub capabilities: ServiceCapabilities,
}

impl CommunityStore {
    fn map_for(&self) -> &TenantRecords {
        match self.store {
            StoreKind::TipCategories => &self.state.tip_categories_by_community,
            StoreKind::Tips => &self.state.tips_by_community,
            StoreKind::Memberships => &self.state.memberships_by_community,
            StoreKind::Invites => &self.state.invites_by_community,
        }
    }

    fn community_key(ctx: &ActiveContext) -> String {
        ctx.community_id.as_str().to_string()
    }

    fn not_found(&self, id: &str) -> anyhow::Error {
        VecinoError::not_found(format!("{}: {id}", self.not_found_prefix)).into_anyhow()
    }

    fn require_id<'a>(&self, id: Option<&'a str>, msg: &'static str) -> Result<&'a str> {
        id.ok_or_else(|| VecinoError::bad_request(msg).into_anyhow())
    }

    pub async fn _create(&self, ctx: &ActiveContext, data: Value, _params: Params) -> Result<Value> {
        let mut obj = data.as_object().cloned().unwrap_or_default();

        let id = obj
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{}:{}", self.id_prefix, Uuid::new_v4()));

        obj.insert("id".to_string(), Value::String(id.clone()));
        let value = Value::Object(obj);

        let community = Self::community_key(ctx);
        let mut by_community = self.map_for().write().await;
        by_community
            .entry(community)
            .or_default()
            .insert(id, value.clone());

        Ok(value)
    }

    pub async fn _find(&self, ctx: &ActiveContext, _params: Params) -> Result<Vec<Value>> {
        let community = Self::community_key(ctx);
        let by_community = self.map_for().read().await;
        let map = by_community.get(&community);
        Ok(map.into_iter().flat_map(|m| m.values()).cloned().collect())
    }

    pub async fn _get(&self, ctx: &ActiveContext, id: &str, _params: Params) -> Result<Value> {
        let community = Self::community_key(ctx);
        let by_community = self.map_for().read().await;
        let map = by_community.get(&community);
        map.and_then(|m| m.get(id))
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn _update(
        &self,
        ctx: &ActiveContext,
        id: &str,
        data: Value,
        _params: Params,
    ) -> Result<Value> {
        let community = Self::community_key(ctx);
        let mut by_community = self.map_for().write().await;
        let map = by_community.entry(community).or_default();
        if !map.contains_key(id) {
            return Err(self.not_found(id));
        }

        let mut obj = data.as_object().cloned().unwrap_or_default();
        obj.insert("id".to_string(), Value::String(id.to_string()));
        let value = Value::Object(obj);
        map.insert(id.to_string(), value.clone());
        Ok(value)
    }

    pub async fn _patch(
        &self,
        ctx: &ActiveContext,
        id: Option<&str>,
        data: Value,
        _params: Params,
    ) -> Result<Value> {
        let id = self.require_id(id, "Patch requires an id")?;

        let community = Self::community_key(ctx);
        let mut by_community = self.map_for().write().await;
        let map = by_community.entry(community).or_default();

        let existing = map.get(id).cloned().ok_or_else(|| self.not_found(id))?;

        let mut record = existing.as_object().cloned().unwrap_or_default();
        if let Some(patch) = data.as_object() {
            for (k, v) in patch {
                if k == "id" {
                    continue;
                }
                record.insert(k.clone(), v.clone());
            }
        }

        record.insert("id".to_string(), Value::String(id.to_string()));
        let value = Value::Object(record);
        map.insert(id.to_string(), value.clone());
        Ok(value)
    }

    pub async fn _remove(
        &self,
        ctx: &ActiveContext,
        id: Option<&str>,
        _params: Params,
    ) -> Result<Value> {
        let id = self.require_id(id, "Remove requires an id")?;

        let community = Self::community_key(ctx);
        let mut by_community = self.map_for().write().await;
        let map = by_community.entry(community).or_default();
        map.remove(id).ok_or_else(|| self.not_found(id))
    }
}

vecino_core::vecino_adapter!(CommunityStore, serde_json::Value, crate::services::Params);

/// Order records by their explicit sort key, ties by creation time.
pub fn sort_records(records: &mut [Value]) {
    records.sort_by(|a, b| {
        let key = |v: &Value| {
            (
                v.get("sortOrder").and_then(Value::as_i64).unwrap_or(i64::MAX),
                v.get("createdAt")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            )
        };
        key(a).cmp(&key(b))
    });
}
