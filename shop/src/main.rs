// shop/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;

use shop_app::config::AppConfig;
use shop_app::db;
use shop_app::state::AppState;
use shop_app::telemetry::init_tracing;
use shop_app::web::configure_app_routes;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Config first: it decides the log format.
  let app_config = AppConfig::from_env().context("failed to load application configuration")?;
  init_tracing(app_config.log_format);

  tracing::info!(
    storage = app_config.storage.name(),
    seed_db = app_config.seed_db,
    "Starting shop cart server..."
  );

  let store = db::connect(&app_config).await.context("failed to open cart storage")?;

  if app_config.seed_db {
    db::seed::seed_demo_data(store.as_ref())
      .await
      .context("failed to seed demo data")?;
  }

  let app_state = AppState::new(store);

  let server_address = app_config.server_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("failed to bind {}", server_address))?
  .run()
  .await
  .context("server terminated with an error")?;

  Ok(())
}
