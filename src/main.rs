mod command;
mod config;
mod session;

use config::ShellConfig;
use ntsh_core::{AuditFields, Dispatcher, Registry};
use std::sync::Arc;
use tokio::net::TcpListener;

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().fmt_fields(AuditFields).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let bell = std::env::var("NTSH_BELL").ok();
    let config = Arc::new(
        ShellConfig::default().with_overrides(std::env::args().nth(1), bell.as_deref()),
    );

    // Every command must be bound before the first line is dispatched
    let registry = Arc::new(Registry::new());
    command::register_builtins(&registry).await;
    info!("Registered {} commands", registry.len().await);

    let dispatcher = Arc::new(Dispatcher::new(registry));

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!("ntsh listening on {}", config.listen_addr);
    if config.bell {
        info!("  Bell enabled for logged commands");
    }

    session::serve(listener, dispatcher, config).await
}
