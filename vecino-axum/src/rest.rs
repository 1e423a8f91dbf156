use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::{OriginalUri, Path, Query, State},
    http::HeaderMap,
    routing, Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use vecino_core::errors::VecinoError;
use vecino_core::{ActiveContext, ServiceMethod, VecinoApp};

use crate::{
    params::{FromRestParams, RestParams},
    AxumState, VecinoAxumError,
};

fn map_json_rejection(rejection: JsonRejection) -> VecinoAxumError {
    VecinoError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.to_string()]}))
        .into_anyhow()
        .into()
}

/// Build the caller's context from headers.
///
/// The adapter only knows what the transport says: which community the
/// request targets and who the session provider says is calling. Role,
/// flags, and the super-admin bit are resolved by the application (a
/// global before hook), never trusted from headers.
fn context_from_headers(headers: &HeaderMap) -> ActiveContext {
    let ctx = headers
        .get("x-community-id")
        .and_then(|v| v.to_str().ok())
        .map(ActiveContext::new)
        .unwrap_or_else(|| ActiveContext::new("default"));

    match headers.get("x-user-id").and_then(|v| v.to_str().ok()) {
        Some(user) => ctx.with_user(user),
        None => ctx,
    }
}

fn require_method<R, P>(
    handle: &vecino_core::ServiceHandle<R, P>,
    name: &str,
    method: ServiceMethod,
) -> Result<(), VecinoAxumError>
where
    R: Send + Sync + 'static,
    P: Send + Sync + Clone + 'static,
{
    if handle.inner().capabilities().allows(&method) {
        Ok(())
    } else {
        Err(VecinoError::method_not_allowed(format!(
            "Service '{name}' does not expose {}",
            method.as_str()
        ))
        .into_anyhow()
        .into())
    }
}

pub fn service_router<R, P>(service_name: Arc<String>, app: Arc<VecinoApp<R, P>>) -> Router<()>
where
    R: Serialize + DeserializeOwned + Send + Sync + 'static,
    P: FromRestParams + Send + Sync + Clone + 'static,
{
    use tower::ServiceBuilder;
    use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
    use tower_http::trace::TraceLayer;

    let state = AxumState { app };

    Router::new()
        .route(
            "/",
            routing::get({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<AxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): Query<std::collections::HashMap<String, String>>,
                      OriginalUri(uri): OriginalUri| async move {
                    let active = context_from_headers(&headers);

                    let params = RestParams::from_parts("rest", &headers, query, "GET", &uri);
                    let params = P::from_rest_params(params);

                    let svc = state.app.service(&service_name)?;
                    require_method(&svc, &service_name, ServiceMethod::Find)?;
                    let res = svc.find(active, params).await?;
                    Ok::<_, VecinoAxumError>(Json(res))
                }
            })
            .post({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<AxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): Query<std::collections::HashMap<String, String>>,
                      OriginalUri(uri): OriginalUri,
                      data: Result<Json<R>, JsonRejection>| async move {
                    let active = context_from_headers(&headers);

                    let Json(data) = data.map_err(map_json_rejection)?;

                    let params = RestParams::from_parts("rest", &headers, query, "POST", &uri);
                    let params = P::from_rest_params(params);

                    let svc = state.app.service(&service_name)?;
                    require_method(&svc, &service_name, ServiceMethod::Create)?;
                    let res = svc.create(active, data, params).await?;
                    Ok::<_, VecinoAxumError>(Json(res))
                }
            }),
        )
        .route(
            "/{id}",
            routing::get({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<AxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): Query<std::collections::HashMap<String, String>>,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>| async move {
                    let active = context_from_headers(&headers);

                    let params = RestParams::from_parts("rest", &headers, query, "GET", &uri);
                    let params = P::from_rest_params(params);

                    let svc = state.app.service(&service_name)?;
                    require_method(&svc, &service_name, ServiceMethod::Get)?;
                    let res = svc.get(active, &id, params).await?;
                    Ok::<_, VecinoAxumError>(Json(res))
                }
            })
            .put({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<AxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): Query<std::collections::HashMap<String, String>>,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>,
                      data: Result<Json<R>, JsonRejection>| async move {
                    let active = context_from_headers(&headers);

                    let Json(data) = data.map_err(map_json_rejection)?;

                    let params = RestParams::from_parts("rest", &headers, query, "PUT", &uri);
                    let params = P::from_rest_params(params);

                    let svc = state.app.service(&service_name)?;
                    require_method(&svc, &service_name, ServiceMethod::Update)?;
                    let res = svc.update(active, &id, data, params).await?;
                    Ok::<_, VecinoAxumError>(Json(res))
                }
            })
            .patch({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<AxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): Query<std::collections::HashMap<String, String>>,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>,
                      data: Result<Json<R>, JsonRejection>| async move {
                    let active = context_from_headers(&headers);

                    let Json(data) = data.map_err(map_json_rejection)?;

                    let params = RestParams::from_parts("rest", &headers, query, "PATCH", &uri);
                    let params = P::from_rest_params(params);

                    let svc = state.app.service(&service_name)?;
                    require_method(&svc, &service_name, ServiceMethod::Patch)?;
                    let res = svc.patch(active, Some(&id), data, params).await?;
                    Ok::<_, VecinoAxumError>(Json(res))
                }
            })
            .delete({
                let service_name = Arc::clone(&service_name);
                move |State(state): State<AxumState<R, P>>,
                      headers: HeaderMap,
                      Query(query): Query<std::collections::HashMap<String, String>>,
                      OriginalUri(uri): OriginalUri,
                      Path(id): Path<String>| async move {
                    let active = context_from_headers(&headers);

                    let params = RestParams::from_parts("rest", &headers, query, "DELETE", &uri);
                    let params = P::from_rest_params(params);

                    let svc = state.app.service(&service_name)?;
                    require_method(&svc, &service_name, ServiceMethod::Remove)?;
                    let res = svc.remove(active, Some(&id), params).await?;
                    Ok::<_, VecinoAxumError>(Json(res))
                }
            }),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
