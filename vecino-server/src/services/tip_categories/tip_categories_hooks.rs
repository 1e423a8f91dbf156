use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use vecino_core::hooks::{AfterHook, HookContext, HookResult};
use vecino_core::schema::HookMeta;
use vecino_core::{Rules, ServiceMethod};

use crate::services::{Params, ServerState};

fn now_ts() -> String {
    Utc::now().to_rfc3339()
}

/// Enrich category reads with the number of tips they hold, so the admin
/// UI can name the affected count before a destructive confirm.
pub struct AttachTipCount {
    pub state: Arc<ServerState>,
}

impl AttachTipCount {
    async fn attach(&self, community: &str, mut record: Value) -> Value {
        let count = match record.get("id").and_then(Value::as_str) {
            Some(id) => self.state.count_tips_in_category(community, id).await,
            None => 0,
        };
        if let Some(obj) = record.as_object_mut() {
            obj.insert("tipCount".to_string(), json!(count));
        }
        record
    }
}

#[async_trait]
impl AfterHook<Value, Params> for AttachTipCount {
    async fn run(&self, ctx: &mut HookContext<Value, Params>) -> Result<()> {
        let Some(res) = ctx.result.take() else {
            return Ok(());
        };

        let community = ctx.active.community_id.as_str().to_string();
        ctx.result = Some(match res {
            HookResult::One(v) => HookResult::One(self.attach(&community, v).await),
            HookResult::Many(vs) => {
                let mut out = Vec::with_capacity(vs.len());
                for v in vs {
                    out.push(self.attach(&community, v).await);
                }
                HookResult::Many(out)
            }
        });

        Ok(())
    }
}

/// Defaults for a new category: id, sort key, timestamps.
pub fn resolve_new_category(data: &mut Value, _meta: &HookMeta<Value, Params>) -> Result<()> {
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    let Some(obj) = data.as_object_mut() else {
        return Ok(());
    };

    if obj.get("id").and_then(Value::as_str).is_none() {
        obj.insert(
            "id".to_string(),
            json!(format!("category:{}", uuid::Uuid::new_v4())),
        );
    }
    if obj.get("sortOrder").and_then(Value::as_i64).is_none() {
        obj.insert("sortOrder".to_string(), json!(0));
    }

    let ts = now_ts();
    obj.entry("createdAt".to_string()).or_insert(json!(ts));
    obj.insert("updatedAt".to_string(), json!(now_ts()));

    Ok(())
}

/// Patch/update only refresh the modified-at stamp.
pub fn touch_updated_at(data: &mut Value, _meta: &HookMeta<Value, Params>) -> Result<()> {
    if let Some(obj) = data.as_object_mut() {
        obj.insert("updatedAt".to_string(), json!(now_ts()));
    }
    Ok(())
}

pub fn validate_category(data: &Value, meta: &HookMeta<Value, Params>) -> Result<()> {
    let obj = data.as_object().cloned().unwrap_or_default();

    let mut rules = Rules::new();
    let creating = matches!(meta.method, ServiceMethod::Create);
    if creating || obj.contains_key("label") {
        let label = obj.get("label").and_then(Value::as_str).unwrap_or("");
        rules = rules.non_empty("label", label);
        if !label.trim().is_empty() {
            rules = rules.min_len("label", label, 2);
        }
    }
    rules.check("Tip category")
}
