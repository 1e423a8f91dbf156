use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use vecino_core::hooks::{HookContext, HookFut, HookResult};
use vecino_core::VecinoApp;

use crate::services::Params;

fn record_id(result: &HookResult<Value>) -> String {
    match result {
        HookResult::One(v) => v
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string(),
        HookResult::Many(_) => "?".to_string(),
    }
}

fn audit_membership<'a>(
    result: &'a HookResult<Value>,
    ctx: &'a HookContext<Value, Params>,
) -> HookFut<'a> {
    Box::pin(async move {
        tracing::info!(
            target: "vecino::audit",
            community = ctx.active.community_id.as_str(),
            method = ctx.method.as_str(),
            record = %record_id(result),
            "membership change"
        );
        Ok(())
    })
}

fn audit_category_removed<'a>(
    result: &'a HookResult<Value>,
    ctx: &'a HookContext<Value, Params>,
) -> HookFut<'a> {
    Box::pin(async move {
        if let HookResult::One(record) = result {
            let removed_tips = record
                .get("removedTips")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            tracing::info!(
                target: "vecino::audit",
                community = ctx.active.community_id.as_str(),
                record = %record_id(result),
                removed_tips,
                "tip category removed with its tips"
            );
        }
        Ok(())
    })
}

/// Audit subscriptions: membership writes and category cascades end up in
/// the log stream.
pub fn configure(app: &VecinoApp<Value, Params>) -> Result<()> {
    app.on_str("memberships.*", Arc::new(audit_membership))?;
    app.on_str("tip-categories.removed", Arc::new(audit_category_removed))?;
    Ok(())
}
