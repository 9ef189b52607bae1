use std::sync::Arc;

use paypal_gateway::{
    build_router, db, AppState, Config, EventLogService, PayPalProvider, SubscriptionProvider,
    SubscriptionStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paypal_gateway=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::build_pool(&config.database_url, 8)?;
    db::run_migrations(&pool).await?;

    let provider = PayPalProvider::new(config.paypal.clone());
    if !provider.is_initialized() {
        tracing::warn!("serving without PayPal credentials; provider calls will fail");
    }

    let app_state = AppState {
        provider: Arc::new(provider),
        payment_service: Arc::new(EventLogService::new(pool.clone())),
        subscriptions: SubscriptionStore::new(pool),
    };

    let app = build_router(app_state);

    // run it with hyper
    let addr = config.bind_addr;
    tracing::debug!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
