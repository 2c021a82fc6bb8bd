// src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use telecart::config::AppConfig;
use telecart::services::CartService;
use telecart::state::AppState;
use telecart::{store, web};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting telecom cart server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Select the store backend from DATABASE_URL (memory:// or postgres://)
  let cart_store = match store::connect(&app_config.database_url).await {
    Ok(store) => store,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialize the cart store.");
      panic!("Store initialization error: {}", e);
    }
  };

  let cart_service = Arc::new(CartService::new(cart_store));

  let app_state = AppState {
    cart_service,
    config: app_config.clone(),
  };

  // Configure and start the Actix Web server
  let server_address = format!("{}:{}", app_config.server_host, app_config.api_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  let server = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::routes::configure_app_routes)
  })
  .bind(&server_address)?;

  tracing::info!("Server is running on port {}", app_config.api_port);
  server.run().await
}
