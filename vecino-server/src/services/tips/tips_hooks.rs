use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use vecino_core::errors::VecinoError;
use vecino_core::hooks::{BeforeHook, HookContext};
use vecino_core::schema::HookMeta;
use vecino_core::{Rules, ServiceMethod};

use crate::services::Params;

fn now_ts() -> String {
    Utc::now().to_rfc3339()
}

pub fn resolve_new_tip(data: &mut Value, meta: &HookMeta<Value, Params>) -> Result<()> {
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    let Some(obj) = data.as_object_mut() else {
        return Ok(());
    };

    if obj.get("id").and_then(Value::as_str).is_none() {
        obj.insert("id".to_string(), json!(format!("tip:{}", uuid::Uuid::new_v4())));
    }
    if obj.get("sortOrder").and_then(Value::as_i64).is_none() {
        obj.insert("sortOrder".to_string(), json!(0));
    }

    // The rich-text document is opaque to the server; new tips start from
    // the configured empty document.
    if !obj.contains_key("content") {
        let empty_doc = meta
            .config
            .get_string("tips.emptyDocument")
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_else(|| json!({}));
        obj.insert("content".to_string(), empty_doc);
    }

    let ts = now_ts();
    obj.entry("createdAt".to_string()).or_insert(json!(ts));
    obj.insert("updatedAt".to_string(), json!(now_ts()));

    Ok(())
}

pub fn touch_updated_at(data: &mut Value, _meta: &HookMeta<Value, Params>) -> Result<()> {
    if let Some(obj) = data.as_object_mut() {
        obj.insert("updatedAt".to_string(), json!(now_ts()));
    }
    Ok(())
}

pub fn validate_tip(data: &Value, meta: &HookMeta<Value, Params>) -> Result<()> {
    let obj = data.as_object().cloned().unwrap_or_default();
    let creating = matches!(meta.method, ServiceMethod::Create);

    let mut rules = Rules::new();
    if creating || obj.contains_key("title") {
        let title = obj.get("title").and_then(Value::as_str).unwrap_or("");
        rules = rules.non_empty("title", title);
    }
    if creating {
        let category = obj.get("categoryId").and_then(Value::as_str).unwrap_or("");
        rules = rules.non_empty("categoryId", category);
    }
    rules.check("Tip")
}

/// A tip's category must exist in the same community before the write is
/// accepted.
pub struct ValidateTipCategoryExists;

#[async_trait]
impl BeforeHook<Value, Params> for ValidateTipCategoryExists {
    async fn run(&self, ctx: &mut HookContext<Value, Params>) -> Result<()> {
        let Some(data) = ctx.data.as_ref() else {
            return Ok(());
        };

        let Some(obj) = data.as_object() else {
            return Ok(());
        };

        let Some(category_id) = obj.get("categoryId") else {
            return Ok(());
        };

        if category_id.is_null() {
            return Ok(());
        }

        let Some(category_id) = category_id.as_str() else {
            return Err(VecinoError::unprocessable("Tip validation failed")
                .with_errors(json!({"categoryId": ["must be a string"]}))
                .into_anyhow());
        };

        if category_id.trim().is_empty() {
            return Err(VecinoError::unprocessable("Tip validation failed")
                .with_errors(json!({"categoryId": ["must not be empty"]}))
                .into_anyhow());
        }

        // Ensure the category exists in this community.
        let categories = ctx.services.service::<Value, Params>("tip-categories")?;
        let res = categories
            .get(&ctx.active, category_id, ctx.params.clone())
            .await;
        if res.is_err() {
            return Err(VecinoError::unprocessable("Tip validation failed")
                .with_errors(json!({"categoryId": ["category not found"]}))
                .into_anyhow());
        }

        Ok(())
    }
}
