//! PayPal subscription provider.
//!
//! The provider holds a client handle that only exists once credentials have
//! been validated. No PayPal REST calls are made yet: creation reports that the
//! integration is unfinished and verification reports an active subscription.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::PayPalCredentials;

pub const PAYPAL: &str = "paypal";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("PayPal client not initialized")]
    NotInitialized,
    #[error("PayPal integration not fully implemented")]
    NotImplemented,
}

impl ProviderError {
    pub fn to_failure(&self) -> ProviderFailure {
        ProviderFailure {
            error: true,
            message: self.to_string(),
        }
    }
}

/// Wire form of a provider failure: `{"error": true, "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    pub error: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
        }
    }
}

/// Success type of [`SubscriptionProvider::create_subscription`]. The PayPal
/// integration does not create subscriptions yet, so it is never returned.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedSubscription {
    pub subscription_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionVerification {
    pub success: bool,
    pub status: SubscriptionStatus,
    pub verified: bool,
}

/// Uniform subscription interface over a payment processor.
pub trait SubscriptionProvider: Send + Sync {
    fn is_initialized(&self) -> bool;

    fn create_subscription(
        &self,
        plan_id: &str,
        customer_info: &Map<String, Value>,
        app_id: &str,
    ) -> Result<CreatedSubscription, ProviderError>;

    fn verify_subscription(
        &self,
        subscription_id: &str,
        payment_info: &Value,
    ) -> Result<SubscriptionVerification, ProviderError>;
}

/// Handle to the PayPal REST API.
#[derive(Debug)]
struct PayPalClient {
    client_id: String,
}

pub struct PayPalProvider {
    credentials: PayPalCredentials,
    client: Option<PayPalClient>,
}

impl PayPalProvider {
    /// Create a provider and attempt initialization straight away.
    pub fn new(credentials: PayPalCredentials) -> Self {
        let mut provider = Self {
            credentials,
            client: None,
        };
        provider.initialize();
        provider
    }

    /// Build the client handle if both credentials are present. Missing
    /// credentials leave the provider uninitialized; they are not an error.
    pub fn initialize(&mut self) {
        if self.client.is_some() {
            return;
        }
        if !self.credentials.is_complete() {
            warn!("PayPal credentials not found. PayPal integration will not work.");
            return;
        }

        let client = PayPalClient {
            client_id: self.credentials.client_id.clone(),
        };
        info!(client_id = %client.client_id, "PayPal client initialized");
        self.client = Some(client);
    }

    fn client(&self) -> Result<&PayPalClient, ProviderError> {
        self.client.as_ref().ok_or(ProviderError::NotInitialized)
    }
}

impl SubscriptionProvider for PayPalProvider {
    fn is_initialized(&self) -> bool {
        self.client.is_some()
    }

    fn create_subscription(
        &self,
        plan_id: &str,
        _customer_info: &Map<String, Value>,
        app_id: &str,
    ) -> Result<CreatedSubscription, ProviderError> {
        self.client()?;
        info!(plan_id, app_id, "PayPal create_subscription called");
        Err(ProviderError::NotImplemented)
    }

    fn verify_subscription(
        &self,
        subscription_id: &str,
        _payment_info: &Value,
    ) -> Result<SubscriptionVerification, ProviderError> {
        self.client()?;
        info!(subscription_id, "PayPal verify_subscription called");
        Ok(SubscriptionVerification {
            success: true,
            status: SubscriptionStatus::Active,
            verified: true,
        })
    }
}
