use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::notify::{LogNotifier, Notifier, SmtpNotifier};
use service::orders::OrderService;
use service::products::ProductService;

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    let host = if cfg.host.trim().is_empty() {
        env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    } else {
        cfg.host.clone()
    };
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.port);
    Ok(format!("{}:{}", host, port).parse()?)
}

fn build_notifier(cfg: &configs::EmailConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    if cfg.smtp_configured() {
        let smtp = SmtpNotifier::new(&cfg.host, cfg.port, cfg.user.clone(), cfg.pass.clone())?;
        info!(host = %cfg.host, port = cfg.port, "smtp notifier configured");
        Ok(Arc::new(smtp))
    } else {
        info!("smtp not configured; order notifications are logged only");
        Ok(Arc::new(LogNotifier))
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;
    common::env::ensure_env(&cfg.data.dir).await?;

    // Record stores, one JSON document per resource
    let products = ProductService::new(cfg.data.products_path());
    let orders = OrderService::new(cfg.data.orders_path());
    products.init().await?;
    orders.init().await?;

    let notifier = build_notifier(&cfg.email)?;

    let state = AppState { products, orders, notifier };
    let app: Router = routes::build_router(state, build_cors());

    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, "starting webshop server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
