use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use vecino_core::context::ActiveContext;
use vecino_core::{ServiceCapabilities, VecinoService};

use crate::services::adapters::store::{sort_records, CommunityStore, StoreKind};
use crate::services::{Params, ServerState};

use super::tips_shared;

/// Resident-facing tips/guides. The `content` payload is an opaque
/// rich-text document; the server stores and returns it untouched.
pub struct TipsService {
    pub adapter: CommunityStore,
}

impl TipsService {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self {
            adapter: CommunityStore {
                state,
                store: StoreKind::Tips,
                id_prefix: "tip",
                not_found_prefix: "Tip not found",
                capabilities: tips_shared::crud_capabilities(),
            },
        }
    }
}

#[async_trait]
impl VecinoService<Value, Params> for TipsService {
    fn capabilities(&self) -> ServiceCapabilities {
        tips_shared::crud_capabilities()
    }

    async fn create(&self, ctx: &ActiveContext, data: Value, params: Params) -> Result<Value> {
        self.adapter._create(ctx, data, params).await
    }

    async fn find(&self, ctx: &ActiveContext, params: Params) -> Result<Vec<Value>> {
        let category = params.query.get("categoryId").cloned();
        let mut records = self.adapter._find(ctx, params).await?;

        if let Some(category) = category {
            records.retain(|v| {
                v.get("categoryId").and_then(Value::as_str) == Some(category.as_str())
            });
        }

        sort_records(&mut records);
        Ok(records)
    }

    async fn get(&self, ctx: &ActiveContext, id: &str, params: Params) -> Result<Value> {
        self.adapter._get(ctx, id, params).await
    }

    async fn update(
        &self,
        ctx: &ActiveContext,
        id: &str,
        data: Value,
        params: Params,
    ) -> Result<Value> {
        self.adapter._update(ctx, id, data, params).await
    }

    async fn patch(
        &self,
        ctx: &ActiveContext,
        id: Option<&str>,
        data: Value,
        params: Params,
    ) -> Result<Value> {
        self.adapter._patch(ctx, id, data, params).await
    }

    async fn remove(&self, ctx: &ActiveContext, id: Option<&str>, params: Params) -> Result<Value> {
        self.adapter._remove(ctx, id, params).await
    }
}
