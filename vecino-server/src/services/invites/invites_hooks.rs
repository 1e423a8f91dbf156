use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Map, Value};
use vecino_core::schema::HookMeta;
use vecino_core::{Role, Rules};

use crate::services::Params;

pub fn resolve_new_invite(data: &mut Value, meta: &HookMeta<Value, Params>) -> Result<()> {
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    let Some(obj) = data.as_object_mut() else {
        return Ok(());
    };

    if obj.get("id").and_then(Value::as_str).is_none() {
        obj.insert(
            "id".to_string(),
            json!(format!("invite:{}", uuid::Uuid::new_v4())),
        );
    }
    if obj.get("token").and_then(Value::as_str).is_none() {
        obj.insert("token".to_string(), json!(uuid::Uuid::new_v4().to_string()));
    }

    obj.insert(
        "communityId".to_string(),
        json!(meta.active.community_id.as_str()),
    );
    obj.insert("status".to_string(), json!("open"));
    obj.entry("role".to_string())
        .or_insert(json!(Role::Resident.as_str()));
    if let Some(user) = meta.active.user_id.as_deref() {
        obj.entry("createdBy".to_string()).or_insert(json!(user));
    }
    obj.entry("createdAt".to_string())
        .or_insert(json!(Utc::now().to_rfc3339()));

    Ok(())
}

pub fn validate_invite(data: &Value, _meta: &HookMeta<Value, Params>) -> Result<()> {
    let obj = data.as_object().cloned().unwrap_or_default();
    let token = obj.get("token").and_then(Value::as_str).unwrap_or("");
    Rules::new().non_empty("token", token).check("Invite")
}
