use std::sync::Arc;

use vecino_core::{SchemaHooksExt, ServiceCapabilities};

use crate::hooks::RequireCommunityAdmin;
use crate::services::Params;

pub fn crud_capabilities() -> ServiceCapabilities {
    ServiceCapabilities::standard_crud()
}

pub fn register_hooks(
    app: &vecino_core::VecinoApp<serde_json::Value, Params>,
) -> anyhow::Result<()> {
    app.service("tips")?.hooks(|h| {
        h.before_create(Arc::new(RequireCommunityAdmin));
        h.before_update(Arc::new(RequireCommunityAdmin));
        h.before_patch(Arc::new(RequireCommunityAdmin));
        h.before_remove(Arc::new(RequireCommunityAdmin));

        h.before_create(Arc::new(super::tips_hooks::ValidateTipCategoryExists));
        h.before_update(Arc::new(super::tips_hooks::ValidateTipCategoryExists));
        h.before_patch(Arc::new(super::tips_hooks::ValidateTipCategoryExists));

        h.schema(|s| {
            s.on_create().resolve(super::tips_hooks::resolve_new_tip);
            s.on_patch().resolve(super::tips_hooks::touch_updated_at);
            s.on_update().resolve(super::tips_hooks::touch_updated_at);
            s.on_writes().validate(super::tips_hooks::validate_tip);
        });
    });
    Ok(())
}
