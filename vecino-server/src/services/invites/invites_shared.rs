use std::sync::Arc;

use vecino_core::{SchemaHooksExt, ServiceCapabilities, ServiceMethod};

use crate::hooks::RequireCommunityAdmin;
use crate::services::Params;

/// Invites are created and read by admins; acceptance happens through the
/// join flow, not through this service.
pub fn crud_capabilities() -> ServiceCapabilities {
    ServiceCapabilities::from_methods(vec![
        ServiceMethod::Find,
        ServiceMethod::Get,
        ServiceMethod::Create,
    ])
}

pub fn register_hooks(
    app: &vecino_core::VecinoApp<serde_json::Value, Params>,
) -> anyhow::Result<()> {
    app.service("invites")?.hooks(|h| {
        h.before_find(Arc::new(RequireCommunityAdmin));
        h.before_get(Arc::new(RequireCommunityAdmin));
        h.before_create(Arc::new(RequireCommunityAdmin));

        h.schema(|s| {
            s.on_create().resolve(super::invites_hooks::resolve_new_invite);
            s.on_create().validate(super::invites_hooks::validate_invite);
        });
    });
    Ok(())
}
