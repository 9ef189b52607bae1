//! Local records of subscriptions approved through PayPal.

use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{NewUserSubscription, SubscriptionPlan, UserSubscription};
use crate::provider::SubscriptionStatus;
use crate::schema::{subscription_plans, user_subscriptions};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Plan not found")]
    PlanNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A user's subscription row joined with the plan it points at.
#[derive(Debug, Serialize)]
pub struct RecordedSubscription {
    #[serde(flatten)]
    pub subscription: UserSubscription,
    pub plan_name: String,
    pub amount: i32,
    pub currency: String,
    pub interval: String,
}

/// End of a billing period. Months count as 30 days, years as 365; unknown
/// intervals fall back to a single month.
pub fn period_end(start: NaiveDateTime, interval: &str, count: i32) -> NaiveDateTime {
    let count = i64::from(count.max(1));
    match interval {
        "month" => start + Duration::days(30 * count),
        "year" => start + Duration::days(365 * count),
        _ => start + Duration::days(30),
    }
}

#[derive(Clone)]
pub struct SubscriptionStore {
    pool: deadpool_diesel::sqlite::Pool,
}

impl SubscriptionStore {
    pub fn new(pool: deadpool_diesel::sqlite::Pool) -> Self {
        Self { pool }
    }

    /// Record an approved PayPal subscription for `user_id`.
    ///
    /// An existing active subscription for the same user and app is moved onto
    /// the new plan and PayPal id; otherwise a new row is inserted. Either way
    /// the period restarts now.
    pub async fn record_paypal_subscription(
        &self,
        user_id: &str,
        plan_id: &str,
        paypal_subscription_id: &str,
        app_id: &str,
    ) -> Result<RecordedSubscription, RecordError> {
        info!(user_id, plan_id, app_id, "Creating PayPal subscription");

        let conn = self
            .pool
            .get()
            .await
            .map_err(|e| StoreError::Pool(e.to_string()))?;
        let user_id = user_id.to_string();
        let plan_id = plan_id.to_string();
        let paypal_subscription_id = paypal_subscription_id.to_string();
        let app_id = app_id.to_string();

        let recorded = conn
            .interact(move |conn| {
                conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    let Some(plan) = subscription_plans::table
                        .filter(subscription_plans::id.eq(&plan_id))
                        .filter(subscription_plans::app_id.eq(&app_id))
                        .select(SubscriptionPlan::as_select())
                        .first(conn)
                        .optional()?
                    else {
                        return Ok(None);
                    };

                    let now = Utc::now().naive_utc();
                    let start = now.format(TIMESTAMP_FORMAT).to_string();
                    let end = period_end(now, &plan.interval, plan.interval_count)
                        .format(TIMESTAMP_FORMAT)
                        .to_string();
                    let active = SubscriptionStatus::Active.as_str();

                    let existing: Option<String> = user_subscriptions::table
                        .filter(user_subscriptions::user_id.eq(&user_id))
                        .filter(user_subscriptions::app_id.eq(&app_id))
                        .filter(user_subscriptions::status.eq(active))
                        .select(user_subscriptions::id)
                        .first(conn)
                        .optional()?;

                    let id = match existing {
                        Some(id) => {
                            diesel::update(user_subscriptions::table.find(&id))
                                .set((
                                    user_subscriptions::plan_id.eq(&plan_id),
                                    user_subscriptions::paypal_subscription_id
                                        .eq(Some(&paypal_subscription_id)),
                                    user_subscriptions::status.eq(active),
                                    user_subscriptions::current_period_start.eq(&start),
                                    user_subscriptions::current_period_end.eq(&end),
                                    user_subscriptions::updated_at.eq(&start),
                                ))
                                .execute(conn)?;
                            id
                        }
                        None => {
                            let id = format!("sub_{}", Uuid::new_v4().simple());
                            diesel::insert_into(user_subscriptions::table)
                                .values(NewUserSubscription {
                                    id: id.clone(),
                                    user_id: user_id.clone(),
                                    plan_id: plan_id.clone(),
                                    paypal_subscription_id: Some(paypal_subscription_id.clone()),
                                    status: active.to_string(),
                                    current_period_start: start.clone(),
                                    current_period_end: end.clone(),
                                    app_id: app_id.clone(),
                                })
                                .execute(conn)?;
                            id
                        }
                    };

                    let subscription = user_subscriptions::table
                        .find(&id)
                        .select(UserSubscription::as_select())
                        .first(conn)?;

                    Ok(Some(RecordedSubscription {
                        subscription,
                        plan_name: plan.name,
                        amount: plan.amount,
                        currency: plan.currency,
                        interval: plan.interval,
                    }))
                })
            })
            .await
            .map_err(|e| StoreError::Interact(e.to_string()))?
            .map_err(StoreError::from)?;

        recorded.ok_or_else(|| {
            error!("Plan not found");
            RecordError::PlanNotFound
        })
    }
}

#[cfg(test)]
pub(crate) async fn seed_plan(
    pool: &deadpool_diesel::sqlite::Pool,
    id: &'static str,
    interval: &'static str,
) {
    let conn = pool.get().await.unwrap();
    conn.interact(move |conn| {
        diesel::insert_into(subscription_plans::table)
            .values((
                subscription_plans::id.eq(id),
                subscription_plans::name.eq("Pro"),
                subscription_plans::amount.eq(99900),
                subscription_plans::currency.eq("INR"),
                subscription_plans::interval.eq(interval),
                subscription_plans::interval_count.eq(1),
                subscription_plans::app_id.eq("marketfit"),
            ))
            .execute(conn)
    })
    .await
    .unwrap()
    .unwrap();
}
