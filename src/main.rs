//! GetSend Chat web server.
//!
//! Entry point for the chat front-end.

use std::sync::Arc;

use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use getsend_web::config::{AppConfig, LogConfig};
use getsend_web::server;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before reading configuration
    let _ = dotenv();

    let config = Arc::new(AppConfig::load()?);
    init_tracing(&config.log);

    server::start_server(config).await?;
    Ok(())
}

/// Initialize tracing (M-LOG-STRUCTURED)
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log.json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
