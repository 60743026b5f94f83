//! Route handlers.
//!
//! Public: `/`, `/health`, `/auth/login`.
//! Protected (behind [`require_bearer`](crate::auth::require_bearer)):
//! the generic resource handlers, instantiated per [`Resource`].

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{Claims, IssuedToken};
use crate::error::GatewayError;
use crate::forward::ForwardRequest;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::resources::Resource;

/// Successful forward: the upstream JSON value, or `null` for an empty body.
pub type Forwarded = Result<Json<Value>, GatewayError>;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "API Gateway is running" }))
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<IssuedToken>, GatewayError> {
    let token = state.login.login(form.username, form.password).await?;
    Ok(Json(token))
}

async fn relay(state: &AppState, headers: &HeaderMap, request: ForwardRequest) -> Forwarded {
    let request = request.with_request_id(request_id(headers));
    let value = state.forwarder.forward(request).await?;
    Ok(Json(value.unwrap_or(Value::Null)))
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
) -> Forwarded {
    tracing::debug!(subject = %claims.sub, service = %R::SERVICE, "List");
    relay(&state, &headers, ForwardRequest::get(R::SERVICE, R::collection_path())).await
}

pub async fn show<R: Resource>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Forwarded {
    tracing::debug!(subject = %claims.sub, service = %R::SERVICE, id, "Show");
    relay(&state, &headers, ForwardRequest::get(R::SERVICE, R::item_path(id))).await
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    Json(payload): Json<R::Create>,
) -> Forwarded {
    let body = serde_json::to_value(&payload)
        .map_err(|e| GatewayError::Internal(format!("failed to encode payload: {}", e)))?;
    tracing::info!(subject = %claims.sub, service = %R::SERVICE, "Create");
    relay(&state, &headers, ForwardRequest::post(R::SERVICE, R::collection_path(), body)).await
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Forwarded {
    let patch = R::PATCH.parse(body).map_err(GatewayError::InvalidPayload)?;
    tracing::info!(subject = %claims.sub, service = %R::SERVICE, id, fields = patch.len(), "Update");
    relay(&state, &headers, ForwardRequest::put(R::SERVICE, R::item_path(id), patch.into_value())).await
}

pub async fn remove<R: Resource>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Forwarded {
    tracing::info!(subject = %claims.sub, service = %R::SERVICE, id, "Delete");
    relay(&state, &headers, ForwardRequest::delete(R::SERVICE, R::item_path(id))).await
}
