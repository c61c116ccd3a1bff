// SPDX-License-Identifier: MIT

//! Mealboard API Server
//!
//! Tracks which household members have eaten, resets the roster every
//! midnight, and pushes notifications when the food is finished.

use mealboard::{
    config::Config,
    db::FirestoreDb,
    services::{scheduler, IdentityVerifier, MealService, PushService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Mealboard API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize identity verifier
    let identity_verifier = Arc::new(
        IdentityVerifier::new(&config.identity_project_id)
            .expect("Failed to initialize identity verifier"),
    );

    // Initialize push sender and meal service
    let push = Arc::new(PushService::new(config.fcm_server_key.clone()));
    let meals = MealService::new(db.clone(), push);

    // The one persistent background task: the midnight reset timer.
    // It lives for the process lifetime and is never cancelled.
    scheduler::spawn_daily_reset(meals.clone());
    tracing::info!("Daily reset task spawned");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity_verifier,
        meals,
    });

    // Build router
    let app = mealboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mealboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
