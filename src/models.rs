use diesel::prelude::*;

#[derive(Debug, serde::Serialize, Queryable, Selectable)]
#[diesel(table_name = crate::schema::webhook_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WebhookEvent {
    pub id: i32,
    pub provider: String,
    pub event_type: String,
    pub entity_id: Option<String>,
    pub payload: String,
    pub processed: bool,
    pub created_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::webhook_events)]
pub struct NewWebhookEvent {
    pub provider: String,
    pub event_type: String,
    pub entity_id: Option<String>,
    pub payload: String,
    pub processed: bool,
}

#[derive(Debug, serde::Serialize, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscription_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub amount: i32,
    pub currency: String,
    pub interval: String,
    pub interval_count: i32,
    pub app_id: String,
    pub paypal_plan_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, serde::Serialize, Queryable, Selectable)]
#[diesel(table_name = crate::schema::user_subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserSubscription {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub paypal_subscription_id: Option<String>,
    pub status: String,
    pub current_period_start: String,
    pub current_period_end: String,
    pub app_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::user_subscriptions)]
pub struct NewUserSubscription {
    pub id: String,
    pub user_id: String,
    pub plan_id: String,
    pub paypal_subscription_id: Option<String>,
    pub status: String,
    pub current_period_start: String,
    pub current_period_end: String,
    pub app_id: String,
}
