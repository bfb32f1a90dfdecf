use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use propledger::config::Config;
use propledger::modules::installments::{
    repositories::InstallmentRepository, services::OverdueChecker,
};
use propledger::modules::{installments, payments};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "propledger=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting PropLedger Sales Accounting Backend");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Apply pending migrations
    sqlx::migrate!()
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Background sweep flipping past-due pending installments to overdue
    let checker = Arc::new(OverdueChecker::new(
        Arc::new(InstallmentRepository::new(db_pool.clone())),
        config.app.overdue_sweep_interval_secs,
    ));
    tokio::spawn(checker.start());

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let app_config = config.app.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(app_config.clone()))
            .route("/health", web::get().to(health_check))
            .configure(installments::controllers::installment_controller::configure)
            .configure(payments::controllers::payment_controller::configure)
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "propledger"
    }))
}
