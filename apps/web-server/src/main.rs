//! Lenta web server entry point.

mod config;
mod handlers;
mod middleware;
mod render;
mod state;
mod telemetry;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use lenta_core::ports::{PasswordService, TokenService};
use lenta_infra::{Argon2PasswordService, JwtTokenService};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    let state = AppState::new(&config).await;

    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

    tracing::info!(host = %config.host, port = config.port, "Starting web server");

    let bind_addr = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .app_data(web::Data::new(passwords.clone()))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
