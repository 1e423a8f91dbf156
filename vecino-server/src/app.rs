use anyhow::Result;
use serde_json::Value;
use vecino_axum::{axum_app, AxumApp};
use vecino_core::VecinoApp;

use crate::services::Params;

pub fn vecino_app() -> Result<AxumApp<Value, Params>> {
    let app: VecinoApp<Value, Params> = VecinoApp::new();
    app.set("http.host", "127.0.0.1");
    app.set("http.port", "3031");
    app.set("tips.emptyDocument", r#"{"type":"doc","content":[]}"#);
    Ok(axum_app(app))
}
