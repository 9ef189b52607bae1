use serde_json::{Map, Value};

fn default_app_id() -> String {
    "marketfit".to_string()
}

#[derive(serde::Deserialize)]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub customer_info: Map<String, Value>,
    #[serde(default = "default_app_id")]
    pub app_id: String,
}

#[derive(serde::Deserialize)]
pub struct VerifySubscriptionRequest {
    #[serde(default)]
    pub subscription_id: String,
    #[serde(default)]
    pub payment_info: Value,
}

#[derive(serde::Deserialize)]
pub struct RecordPayPalRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub paypal_subscription_id: String,
    #[serde(default = "default_app_id")]
    pub app_id: String,
}

#[derive(serde::Serialize)]
pub struct SubscriptionEnvelope<T> {
    pub subscription: T,
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
