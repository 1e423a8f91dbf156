mod app;
mod events;
mod hooks;
mod routes;
mod services;

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use vecino_axum::AxumApp;

pub use services::{Params, ServerState};

pub fn build() -> Result<AxumApp<Value, Params>> {
    let ax = app::vecino_app()?;
    let state = Arc::new(services::ServerState::seeded());

    hooks::global_hooks(ax.app.as_ref(), Arc::clone(&state));
    events::configure(ax.app.as_ref())?;

    let svcs = services::configure(ax.app.as_ref(), Arc::clone(&state))?;

    let ax = ax
        .use_service("/tip-categories", svcs.tip_categories)
        .use_service("/tips", svcs.tips)
        .use_service("/memberships", svcs.memberships)
        .use_service("/invites", svcs.invites)
        .use_service("/navigation", svcs.navigation)
        .use_router("/session", routes::session_router(Arc::clone(&state)))
        .use_router("/join", routes::join_router(Arc::clone(&state)))
        .service("/health", || async { "ok" });

    Ok(ax)
}
