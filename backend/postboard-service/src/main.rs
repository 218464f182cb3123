use actix_middleware::{RequestLogging, SessionAuth};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use crypto_core::TokenSigner;
use db_pool::{create_pool, DbConfig};
use postboard_service::services::{EmailService, Mailer};
use postboard_service::{handlers, routes, telemetry, AppState, AuthSettings, Config, MIGRATOR};
use std::sync::Arc;
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(?config, "Starting postboard-service");

    let db_config = DbConfig::from_env("postboard-service");
    db_config.log_config();
    let db = create_pool(db_config)
        .await
        .context("Failed to create database pool")?;

    MIGRATOR
        .run(&db)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");

    let tokens = Arc::new(
        TokenSigner::from_secret(config.secret_key.as_bytes())
            .context("Failed to initialise token signer")?,
    );

    let email = EmailService::new(&config.mail_settings()).context("Failed to configure mail")?;
    info!(enabled = email.is_enabled(), "Email service ready");
    if config.links_follow_request_host() {
        warn!("PUBLIC_BASE_URL is not set; password reset links will trust the request Host header");
    }
    let mailer: Arc<dyn Mailer> = Arc::new(email);

    let state = web::Data::new(AppState {
        db,
        tokens,
        mailer,
        settings: AuthSettings::from_config(&config),
    });

    let (host, port) = config.bind_address();
    info!(%host, port, "Listening");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(SessionAuth::new(state.tokens.clone()))
            .wrap(RequestLogging::new().redact_after(handlers::RESET_TOKEN_PREFIX))
            .wrap(tracing_actix_web::TracingLogger::<telemetry::RouteRootSpan>::new())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
