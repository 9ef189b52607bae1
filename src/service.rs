//! Payment service seam the webhook handler delegates to, plus the default
//! implementation that records every event in SQLite.

use async_trait::async_trait;
use diesel::prelude::*;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};

use crate::db::StoreError;
use crate::models::{NewWebhookEvent, WebhookEvent};
use crate::provider::PAYPAL;
use crate::schema::webhook_events;

#[derive(Debug, Error)]
pub enum PaymentServiceError {
    #[error("Handler error: {0}")]
    Handler(String),
}

#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Process a provider webhook and return a result to echo back to the caller.
    async fn handle_webhook(&self, event: &Value, provider: &str)
        -> Result<Value, PaymentServiceError>;
}

/// Records each webhook twice: once on receipt, once with the outcome.
#[derive(Clone)]
pub struct EventLogService {
    pool: deadpool_diesel::sqlite::Pool,
}

impl EventLogService {
    pub fn new(pool: deadpool_diesel::sqlite::Pool) -> Self {
        Self { pool }
    }

    async fn record(&self, record: NewWebhookEvent) -> Result<(), StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        conn.interact(move |conn| {
            diesel::insert_into(webhook_events::table)
                .values(&record)
                .execute(conn)
        })
        .await
        .map_err(|e| StoreError::Interact(e.to_string()))??;
        Ok(())
    }

    /// The log is an audit trail; a failed write must not fail the delivery.
    async fn record_or_log(&self, record: NewWebhookEvent) {
        let event_type = record.event_type.clone();
        if let Err(e) = self.record(record).await {
            error!(event_type = %event_type, error = %e, "Error logging event");
        }
    }

    /// Most recent events first.
    pub async fn recent_events(&self, limit: i64) -> Result<Vec<WebhookEvent>, StoreError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        let events = conn
            .interact(move |conn| {
                webhook_events::table
                    .order(webhook_events::id.desc())
                    .limit(limit)
                    .select(WebhookEvent::as_select())
                    .load(conn)
            })
            .await
            .map_err(|e| StoreError::Interact(e.to_string()))??;
        Ok(events)
    }
}

fn entity_id(event: &Value) -> Option<String> {
    event
        .pointer("/resource/id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn dispatch(provider: &str, event_type: &str) -> Value {
    match provider {
        PAYPAL => {
            info!(event_type, "PayPal webhook handling not fully implemented");
            json!({"status": "ignored", "message": "PayPal webhook handling not implemented"})
        }
        other => {
            error!(provider = other, "Unknown provider");
            json!({"status": "error", "message": format!("Unknown provider: {other}")})
        }
    }
}

#[async_trait]
impl PaymentService for EventLogService {
    async fn handle_webhook(
        &self,
        event: &Value,
        provider: &str,
    ) -> Result<Value, PaymentServiceError> {
        let Some(event_type) = event.get("event_type").and_then(Value::as_str) else {
            error!(provider, "Invalid webhook payload - no event type");
            return Ok(json!({"status": "error", "message": "Invalid webhook payload"}));
        };
        info!(provider, event_type, "Processing webhook event");

        let entity_id = entity_id(event);
        self.record_or_log(NewWebhookEvent {
            provider: provider.to_string(),
            event_type: event_type.to_string(),
            entity_id: entity_id.clone(),
            payload: event.to_string(),
            processed: false,
        })
        .await;

        let result = dispatch(provider, event_type);

        self.record_or_log(NewWebhookEvent {
            provider: provider.to_string(),
            event_type: format!("{event_type}_processed"),
            entity_id,
            payload: result.to_string(),
            processed: true,
        })
        .await;

        Ok(result)
    }
}
