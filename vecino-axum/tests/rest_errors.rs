use std::sync::Arc;

use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use vecino_axum::axum_app;
use vecino_core::errors::VecinoError;
use vecino_core::{
    ActiveContext, ServiceCapabilities, ServiceMethod, VecinoApp, VecinoService,
};

struct UnprocessableOnCreate;

#[async_trait::async_trait]
impl VecinoService<Value, ()> for UnprocessableOnCreate {
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::from_methods(vec![ServiceMethod::Create])
    }

    async fn create(&self, _ctx: &ActiveContext, _data: Value, _params: ()) -> anyhow::Result<Value> {
        Err(VecinoError::unprocessable("Invalid")
            .with_errors(json!({"title": ["required"]}))
            .into_anyhow())
    }
}

struct BoomOnCreate;

#[async_trait::async_trait]
impl VecinoService<Value, ()> for BoomOnCreate {
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::from_methods(vec![ServiceMethod::Create])
    }

    async fn create(&self, _ctx: &ActiveContext, _data: Value, _params: ()) -> anyhow::Result<Value> {
        Err(anyhow::anyhow!("boom"))
    }
}

struct EchoContext;

#[async_trait::async_trait]
impl VecinoService<Value, ()> for EchoContext {
    fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities::read_only()
    }

    async fn find(&self, ctx: &ActiveContext, _params: ()) -> anyhow::Result<Vec<Value>> {
        Ok(vec![json!({
            "communityId": ctx.community_id.as_str(),
            "userId": ctx.user_id,
        })])
    }
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn malformed_json_returns_bad_request_shape() {
    let app: VecinoApp<Value, ()> = VecinoApp::new();
    let ax = axum_app(app).use_service("/tips", Arc::new(BoomOnCreate));

    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tips")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\":\"x\""))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 400);
    assert!(res.headers().get("x-request-id").is_some());
    let body = json_body(res).await;
    assert_eq!(body["name"], "BadRequest");
    assert_eq!(body["code"], 400);
    assert_eq!(body["className"], "bad-request");
    assert!(body.get("errors").is_some());
}

#[tokio::test]
async fn request_id_is_preserved_when_provided() {
    let app: VecinoApp<Value, ()> = VecinoApp::new();
    let ax = axum_app(app).use_service("/tips", Arc::new(BoomOnCreate));

    let provided = HeaderValue::from_static("req-test-123");
    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tips")
                .header("content-type", "application/json")
                .header("x-request-id", provided.clone())
                .body(Body::from("{\"title\":\"ok\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.headers().get("x-request-id").unwrap(), &provided);
}

#[tokio::test]
async fn unprocessable_preserves_422_and_shape() {
    let app: VecinoApp<Value, ()> = VecinoApp::new();
    let ax = axum_app(app).use_service("/tips", Arc::new(UnprocessableOnCreate));

    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tips")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\":\"ok\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 422);
    let body = json_body(res).await;
    assert_eq!(body["name"], "Unprocessable");
    assert_eq!(body["code"], 422);
    assert_eq!(body["className"], "unprocessable");
    assert_eq!(body["errors"], json!({"title": ["required"]}));
}

#[tokio::test]
async fn non_structured_errors_map_to_general_error_shape() {
    let app: VecinoApp<Value, ()> = VecinoApp::new();
    let ax = axum_app(app).use_service("/tips", Arc::new(BoomOnCreate));

    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tips")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\":\"ok\"}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body = json_body(res).await;
    assert_eq!(body["name"], "GeneralError");
    assert_eq!(body["code"], 500);
    assert_eq!(body["className"], "general-error");
    assert!(body["message"].as_str().unwrap().contains("boom"));
}

#[tokio::test]
async fn methods_outside_capabilities_are_405() {
    // BoomOnCreate only exposes create; find must be refused before the
    // service is ever called.
    let app: VecinoApp<Value, ()> = VecinoApp::new();
    let ax = axum_app(app).use_service("/tips", Arc::new(BoomOnCreate));

    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/tips")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 405);
    let body = json_body(res).await;
    assert_eq!(body["name"], "MethodNotAllowed");
    assert_eq!(body["className"], "method-not-allowed");
}

#[tokio::test]
async fn context_is_built_from_headers() {
    let app: VecinoApp<Value, ()> = VecinoApp::new();
    let ax = axum_app(app).use_service("/echo", Arc::new(EchoContext));

    let res = ax
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/echo")
                .header("x-community-id", "laurel-court")
                .header("x-user-id", "ana")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    let body = json_body(res).await;
    assert_eq!(body[0]["communityId"], "laurel-court");
    assert_eq!(body[0]["userId"], "ana");

    // No headers: community falls back to "default", user stays unset.
    let res = ax
        .router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/echo")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(res).await;
    assert_eq!(body[0]["communityId"], "default");
    assert_eq!(body[0]["userId"], Value::Null);
}
