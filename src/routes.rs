//! HTTP surface: the PayPal webhook endpoint and the provider operations.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::dtos::{
    CreateSubscriptionRequest, HealthResponse, RecordPayPalRequest, SubscriptionEnvelope,
    VerifySubscriptionRequest,
};
use crate::provider::{
    CreatedSubscription, ProviderError, SubscriptionProvider, SubscriptionVerification,
};
use crate::service::PaymentService;
use crate::subscriptions::{RecordError, RecordedSubscription, SubscriptionStore};
use crate::webhook::{self, WebhookAccepted, WebhookError};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SubscriptionProvider>,
    pub payment_service: Arc<dyn PaymentService>,
    pub subscriptions: SubscriptionStore,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/subscriptions/paypal-webhook", post(paypal_webhook))
        .route("/api/subscriptions/paypal/create", post(create_subscription))
        .route("/api/subscriptions/paypal/verify", post(verify_subscription))
        .route("/api/subscriptions/record-paypal", post(record_paypal_subscription))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn paypal_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAccepted>, WebhookError> {
    webhook::handle_webhook(state.payment_service.as_ref(), &headers, &body)
        .await
        .map(Json)
}

async fn create_subscription(
    State(state): State<AppState>,
    request: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<Json<SubscriptionEnvelope<CreatedSubscription>>, Response> {
    let Json(request) = request.map_err(rejection)?;
    if request.plan_id.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "Plan ID is required"));
    }
    let subscription = state
        .provider
        .create_subscription(&request.plan_id, &request.customer_info, &request.app_id)
        .map_err(provider_error)?;
    Ok(Json(SubscriptionEnvelope { subscription }))
}

async fn verify_subscription(
    State(state): State<AppState>,
    request: Result<Json<VerifySubscriptionRequest>, JsonRejection>,
) -> Result<Json<SubscriptionVerification>, Response> {
    let Json(request) = request.map_err(rejection)?;
    if request.subscription_id.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Subscription ID is required",
        ));
    }
    state
        .provider
        .verify_subscription(&request.subscription_id, &request.payment_info)
        .map(Json)
        .map_err(provider_error)
}

async fn record_paypal_subscription(
    State(state): State<AppState>,
    request: Result<Json<RecordPayPalRequest>, JsonRejection>,
) -> Result<Json<SubscriptionEnvelope<RecordedSubscription>>, Response> {
    let Json(request) = request.map_err(rejection)?;
    if request.user_id.is_empty()
        || request.plan_id.is_empty()
        || request.paypal_subscription_id.is_empty()
    {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Missing required parameters",
        ));
    }

    let subscription = state
        .subscriptions
        .record_paypal_subscription(
            &request.user_id,
            &request.plan_id,
            &request.paypal_subscription_id,
            &request.app_id,
        )
        .await
        .map_err(|err| match err {
            RecordError::PlanNotFound => {
                error_response(StatusCode::NOT_FOUND, &err.to_string())
            }
            RecordError::Store(_) => {
                tracing::error!(error = %err, "Error recording PayPal subscription");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        })?;
    Ok(Json(SubscriptionEnvelope { subscription }))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Malformed bodies get the same `{"error": ...}` shape as every other failure.
fn rejection(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), &rejection.body_text())
}

/// Provider failures keep their `{"error": true, "message": ...}` shape.
fn provider_error(err: ProviderError) -> Response {
    tracing::warn!(provider = "paypal", error = %err, "Provider call failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(err.to_failure())).into_response()
}
