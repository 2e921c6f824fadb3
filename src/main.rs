// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PetID API Server
//!
//! Pet health records: profiles, vaccine checklists, symptom diary and an
//! AI veterinary assistant.

use petid_api::{config::Config, db::Database, services::Argon2Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        backend = ?config.database_backend,
        "Starting PetID API"
    );

    let db = Database::connect(&config)
        .await
        .expect("Failed to connect to database");

    if config.llm_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set, AI endpoints will return errors");
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!(dir = %config.upload_dir.display(), "Serving uploads");

    // Build shared state
    let state = Arc::new(
        AppState::new(config.clone(), db, Argon2Config::default())
            .expect("Failed to initialize application state"),
    );

    // Build router
    let app = petid_api::routes::create_router(state);

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
                .add_directive("petid_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
