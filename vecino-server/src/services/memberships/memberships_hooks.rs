use anyhow::Result;
use chrono::Utc;
use serde_json::{json, Map, Value};
use vecino_core::schema::HookMeta;
use vecino_core::{Role, Rules, ServiceMethod};

use crate::services::Params;

pub fn resolve_new_membership(data: &mut Value, meta: &HookMeta<Value, Params>) -> Result<()> {
    if !data.is_object() {
        *data = Value::Object(Map::new());
    }
    let Some(obj) = data.as_object_mut() else {
        return Ok(());
    };

    if obj.get("id").and_then(Value::as_str).is_none() {
        obj.insert(
            "id".to_string(),
            json!(format!("membership:{}", uuid::Uuid::new_v4())),
        );
    }

    // Records always carry the community they belong to, regardless of
    // what the caller sent.
    obj.insert(
        "communityId".to_string(),
        json!(meta.active.community_id.as_str()),
    );

    obj.entry("role".to_string())
        .or_insert(json!(Role::Resident.as_str()));
    obj.entry("isDefault".to_string()).or_insert(json!(false));
    obj.entry("active".to_string()).or_insert(json!(true));
    obj.entry("createdAt".to_string())
        .or_insert(json!(Utc::now().to_rfc3339()));

    Ok(())
}

pub fn validate_membership(data: &Value, meta: &HookMeta<Value, Params>) -> Result<()> {
    let obj = data.as_object().cloned().unwrap_or_default();
    let creating = matches!(meta.method, ServiceMethod::Create);

    let mut rules = Rules::new();
    if creating {
        let user = obj.get("userId").and_then(Value::as_str).unwrap_or("");
        rules = rules.non_empty("userId", user);
    }
    rules.check("Membership")?;

    // An unknown role string must not slip into the store.
    if let Some(role) = obj.get("role") {
        if serde_json::from_value::<Role>(role.clone()).is_err() {
            return Err(vecino_core::errors::VecinoError::unprocessable(
                "Membership validation failed",
            )
            .with_errors(json!({"role": ["must be resident or community_admin"]}))
            .into_anyhow());
        }
    }

    Ok(())
}
