use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use vecino_core::context::ActiveContext;
use vecino_core::errors::VecinoError;
use vecino_core::{ServiceCapabilities, ServiceMethod, VecinoService};
use vecino_nav::{bottom_bar_items, overflow_sections, visible_items};

/// Read-only view over the navigation resolver: UI surfaces ask for their
/// item list here and render it as-is, so no gating logic ever leaks into
/// a component.
///
/// `?surface=full` (default) — the ordered visible set.
/// `?surface=bottom` — the capped compact-bar subset.
/// `?surface=overflow` — the visible set partitioned by section.
pub struct NavigationService;

#[async_trait]
impl VecinoService<Value, crate::services::Params> for NavigationService {
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::from_methods(vec![ServiceMethod::Find])
    }

    async fn find(
        &self,
        ctx: &ActiveContext,
        params: crate::services::Params,
    ) -> Result<Vec<Value>> {
        let surface = params
            .query
            .get("surface")
            .map(String::as_str)
            .unwrap_or("full");

        match surface {
            "full" => visible_items(ctx.role, ctx.super_admin, &ctx.flags)
                .into_iter()
                .map(|item| serde_json::to_value(item).map_err(Into::into))
                .collect(),
            "bottom" => bottom_bar_items(ctx.role, ctx.super_admin, &ctx.flags)
                .into_iter()
                .map(|item| serde_json::to_value(item).map_err(Into::into))
                .collect(),
            "overflow" => {
                let sections = overflow_sections(ctx.role, ctx.super_admin, &ctx.flags);
                Ok(vec![serde_json::to_value(sections)?])
            }
            other => Err(VecinoError::bad_request(format!(
                "Unknown navigation surface '{other}'"
            ))
            .into_anyhow()),
        }
    }
}
