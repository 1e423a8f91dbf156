use std::sync::Arc;

use vecino_core::{SchemaHooksExt, ServiceCapabilities, ServiceMethod};

use crate::hooks::RequireCommunityAdmin;
use crate::services::Params;

/// No `Remove`: the HTTP adapter answers 405 for DELETE, because
/// residency history is deactivated, never deleted.
pub fn crud_capabilities() -> ServiceCapabilities {
    ServiceCapabilities::from_methods(vec![
        ServiceMethod::Find,
        ServiceMethod::Get,
        ServiceMethod::Create,
        ServiceMethod::Patch,
    ])
}

pub fn register_hooks(
    app: &vecino_core::VecinoApp<serde_json::Value, Params>,
) -> anyhow::Result<()> {
    app.service("memberships")?.hooks(|h| {
        h.before_create(Arc::new(RequireCommunityAdmin));
        h.before_patch(Arc::new(RequireCommunityAdmin));

        h.schema(|s| {
            s.on_create()
                .resolve(super::memberships_hooks::resolve_new_membership);
            s.on_writes()
                .validate(super::memberships_hooks::validate_membership);
        });
    });
    Ok(())
}
