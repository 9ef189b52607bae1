//! PayPal payment-gateway integration: a subscription provider and the
//! webhook endpoint PayPal calls back into.

pub mod config;
pub mod db;
pub mod dtos;
pub mod models;
pub mod provider;
pub mod routes;
pub mod schema;
pub mod service;
pub mod subscriptions;
pub mod webhook;

pub use config::{Config, ConfigError, PayPalCredentials};
pub use provider::{PayPalProvider, ProviderError, SubscriptionProvider};
pub use routes::{build_router, AppState};
pub use service::{EventLogService, PaymentService, PaymentServiceError};
pub use subscriptions::{RecordError, SubscriptionStore};
pub use webhook::{handle_webhook, verify_signature, WebhookError};
