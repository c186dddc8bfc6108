use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{error, info};

use web::bootstrap::app_context::{AppContext, AppServices};
use web::bootstrap::config::Config;
use web::bootstrap::pipeline;
use web::infrastructure::db::migrations::SqlxSchemaMigrations;
use web::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use web::presentation::{endpoints, http::health, route_casing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "web=debug,tower_http=info,axum=info".into()),
        )
        .init();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid_configuration");
            return Err(e.into());
        }
    };
    info!(environment = %cfg.environment, http_port = cfg.http_port, https_port = ?cfg.https_port, "Starting web host");

    // Database
    let pool = web::infrastructure::db::connect_pool(&cfg.connection_string, cfg.db_max_connections)?;
    if cfg.migrate_on_startup {
        web::infrastructure::db::migrate(&pool).await?;
        info!("migrations_applied_on_startup");
    }

    let services = AppServices::new(
        Arc::new(SqlxUserRepository::new(pool.clone())),
        Arc::new(SqlxSchemaMigrations::new(pool.clone())),
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let routed = endpoints(ctx.clone())?.merge(health::routes(pool, cfg.environment.to_string()));
    let app = pipeline::build(ctx, routed, route_casing()?);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Application is shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "ctrl_c_handler_failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(?e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
