use std::sync::Arc;

use vecino_core::{SchemaHooksExt, ServiceCapabilities, ServiceMethod};

use crate::hooks::RequireCommunityAdmin;
use crate::services::{Params, ServerState};

pub fn crud_capabilities() -> ServiceCapabilities {
    ServiceCapabilities::from_methods(vec![
        ServiceMethod::Create,
        ServiceMethod::Find,
        ServiceMethod::Get,
        ServiceMethod::Update,
        ServiceMethod::Patch,
        ServiceMethod::Remove,
    ])
}

pub fn register_hooks(
    app: &vecino_core::VecinoApp<serde_json::Value, Params>,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    app.service("tip-categories")?.hooks(|h| {
        h.before_create(Arc::new(RequireCommunityAdmin));
        h.before_update(Arc::new(RequireCommunityAdmin));
        h.before_patch(Arc::new(RequireCommunityAdmin));
        h.before_remove(Arc::new(RequireCommunityAdmin));

        h.after_find(Arc::new(super::tip_categories_hooks::AttachTipCount {
            state: Arc::clone(&state),
        }));
        h.after(
            ServiceMethod::Get,
            Arc::new(super::tip_categories_hooks::AttachTipCount { state }),
        );

        h.schema(|s| {
            s.on_create()
                .resolve(super::tip_categories_hooks::resolve_new_category);
            s.on_patch()
                .resolve(super::tip_categories_hooks::touch_updated_at);
            s.on_update()
                .resolve(super::tip_categories_hooks::touch_updated_at);
            s.on_writes()
                .validate(super::tip_categories_hooks::validate_category);
        });
    });
    Ok(())
}
