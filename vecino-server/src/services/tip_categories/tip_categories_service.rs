use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use vecino_core::context::ActiveContext;
use vecino_core::{ServiceCapabilities, VecinoService};

use crate::services::adapters::store::{sort_records, CommunityStore, StoreKind};
use crate::services::{Params, ServerState};

use super::tip_categories_shared;

/// Guide categories. Ordering is controlled by the explicit `sortOrder`
/// key; removal cascades over the category's tips.
pub struct TipCategoriesService {
    pub adapter: CommunityStore,
}

impl TipCategoriesService {
    pub fn new(state: Arc<ServerState>) -> Self {
        Self {
            adapter: CommunityStore {
                state,
                store: StoreKind::TipCategories,
                id_prefix: "category",
                not_found_prefix: "Tip category not found",
                capabilities: tip_categories_shared::crud_capabilities(),
            },
        }
    }
}

#[async_trait]
impl VecinoService<Value, Params> for TipCategoriesService {
    fn capabilities(&self) -> ServiceCapabilities {
        tip_categories_shared::crud_capabilities()
    }

    async fn create(&self, ctx: &ActiveContext, data: Value, params: Params) -> Result<Value> {
        self.adapter._create(ctx, data, params).await
    }

    async fn find(&self, ctx: &ActiveContext, params: Params) -> Result<Vec<Value>> {
        let mut records = self.adapter._find(ctx, params).await?;
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

    /// Cascading remove: the category's tips go first, then the category
    /// itself — two independent deletes with no transaction. A failure in
    /// either pass leaves the other's effect in place; callers confirm the
    /// affected tip count up front (it is reported on find/get and echoed
    /// back here as `removedTips`).
    async fn remove(&self, ctx: &ActiveContext, id: Option<&str>, params: Params) -> Result<Value> {
        let community = ctx.community_id.as_str().to_string();
        let category_id = id.map(|s| s.to_string());

        let removed_tips = match category_id.as_deref() {
            Some(cid) => {
                self.adapter
                    .state
                    .remove_tips_in_category(&community, cid)
                    .await
            }
            None => 0,
        };

        let mut removed = match self.adapter._remove(ctx, id, params).await {
            Ok(record) => record,
            Err(err) => {
                if removed_tips > 0 {
                    tracing::warn!(
                        community = %community,
                        category = ?category_id,
                        removed_tips,
                        "category delete failed after its tips were removed; tips stay deleted"
                    );
                }
                return Err(err);
            }
        };

        if let Some(obj) = removed.as_object_mut() {
            obj.insert("removedTips".to_string(), json!(removed_tips));
        }
        Ok(removed)
    }
}
