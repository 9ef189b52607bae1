//! PayPal webhook handling.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::provider::PAYPAL;
use crate::service::PaymentService;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid webhook payload")]
    MissingField,
    #[error("{0}")]
    Unhandled(String),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::MissingField => StatusCode::BAD_REQUEST,
            WebhookError::Unhandled(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Body returned to PayPal once an event has been handed off.
#[derive(Debug, Serialize)]
pub struct WebhookAccepted {
    pub status: &'static str,
    pub message: String,
    pub result: Value,
}

/// Verify the PayPal transmission signature.
///
/// Placeholder: accepts every request. Real verification needs the
/// `PAYPAL-TRANSMISSION-*` headers checked against PayPal's certificate.
pub fn verify_signature(_headers: &HeaderMap, _payload: &Value) -> bool {
    info!("PayPal webhook signature verification placeholder");
    true
}

/// Parse, check and delegate one webhook delivery.
pub async fn handle_webhook<S>(
    payment_service: &S,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookAccepted, WebhookError>
where
    S: PaymentService + ?Sized,
{
    info!("Received PayPal webhook");

    let result = process(payment_service, headers, body).await;
    if let Err(WebhookError::Unhandled(ref message)) = result {
        error!(
            error = %message,
            request = %String::from_utf8_lossy(body),
            "Error handling PayPal webhook"
        );
    }
    result
}

async fn process<S>(
    payment_service: &S,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookAccepted, WebhookError>
where
    S: PaymentService + ?Sized,
{
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| WebhookError::Unhandled(e.to_string()))?;
    if !payload.is_object() {
        return Err(WebhookError::Unhandled(
            "webhook payload is not a JSON object".to_string(),
        ));
    }

    if !verify_signature(headers, &payload) {
        warn!("Invalid PayPal webhook signature");
        return Err(WebhookError::InvalidSignature);
    }

    let event_type = match payload.get("event_type").and_then(Value::as_str) {
        Some(event_type) if !event_type.is_empty() => event_type,
        _ => {
            error!("No event type in PayPal webhook");
            return Err(WebhookError::MissingField);
        }
    };

    info!(event_type, "Processing PayPal webhook");

    let result = payment_service
        .handle_webhook(&payload, PAYPAL)
        .await
        .map_err(|e| WebhookError::Unhandled(e.to_string()))?;

    Ok(WebhookAccepted {
        status: "success",
        message: format!("Processed {event_type} event"),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::PaymentServiceError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingService {
        calls: Mutex<Vec<(Value, String)>>,
    }

    #[async_trait]
    impl PaymentService for RecordingService {
        async fn handle_webhook(
            &self,
            event: &Value,
            provider: &str,
        ) -> Result<Value, PaymentServiceError> {
            self.calls
                .lock()
                .unwrap()
                .push((event.clone(), provider.to_string()));
            Ok(json!({"status": "ignored"}))
        }
    }

    struct FailingService;

    #[async_trait]
    impl PaymentService for FailingService {
        async fn handle_webhook(
            &self,
            _event: &Value,
            _provider: &str,
        ) -> Result<Value, PaymentServiceError> {
            Err(PaymentServiceError::Handler("database unavailable".into()))
        }
    }

    #[test]
    fn test_verify_signature_placeholder_accepts_anything() {
        let mut headers = HeaderMap::new();
        assert!(verify_signature(&headers, &Value::Null));
        headers.insert("paypal-transmission-sig", "bogus".parse().unwrap());
        assert!(verify_signature(&headers, &json!({"event_type": "X"})));
    }

    #[tokio::test]
    async fn test_valid_payload_is_delegated() {
        let service = RecordingService::default();
        let body = br#"{"event_type":"BILLING.SUBSCRIPTION.CREATED","id":"WH-1"}"#;

        let accepted = handle_webhook(&service, &HeaderMap::new(), body)
            .await
            .unwrap();
        assert_eq!(accepted.status, "success");
        assert_eq!(accepted.message, "Processed BILLING.SUBSCRIPTION.CREATED event");
        assert_eq!(accepted.result, json!({"status": "ignored"}));

        let calls = service.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "paypal");
        assert_eq!(calls[0].0["id"], "WH-1");
    }

    #[tokio::test]
    async fn test_missing_event_type_is_bad_request() {
        let service = RecordingService::default();
        for body in [
            r#"{"id":"WH-1"}"#,
            r#"{"event_type":""}"#,
            r#"{"event_type":42}"#,
        ] {
            let err = handle_webhook(&service, &HeaderMap::new(), body.as_bytes())
                .await
                .unwrap_err();
            assert!(matches!(err, WebhookError::MissingField));
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
        assert!(service.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_internal_error() {
        let service = RecordingService::default();
        for body in ["not json", "[1,2,3]"] {
            let err = handle_webhook(&service, &HeaderMap::new(), body.as_bytes())
                .await
                .unwrap_err();
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn test_service_failure_is_internal_error() {
        let err = handle_webhook(
            &FailingService,
            &HeaderMap::new(),
            br#"{"event_type":"PAYMENT.SALE.COMPLETED"}"#,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Handler error: database unavailable");
    }

    async fn response_parts(err: WebhookError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_signature_response() {
        assert_eq!(WebhookError::InvalidSignature.status(), StatusCode::BAD_REQUEST);

        let (status, body) = response_parts(WebhookError::InvalidSignature).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid signature"}));
    }

    #[tokio::test]
    async fn test_error_wire_form() {
        let (status, body) = response_parts(WebhookError::MissingField).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid webhook payload"}));

        let (status, body) = response_parts(WebhookError::Unhandled("boom".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "boom"}));
    }
}
