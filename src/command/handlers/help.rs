//! help handler

use async_trait::async_trait;
use ntsh_core::{Handler, Registry, RelayWriter};
use std::fmt::Write;
use std::sync::Weak;
use tokio::io::AsyncWriteExt;

/// Lists the registered commands.
///
/// Holds the registry weakly since the registry owns this handler.
pub struct Help {
    registry: Weak<Registry>,
}

impl Help {
    pub fn new(registry: Weak<Registry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Handler for Help {
    async fn call(&self, _name: &str, _args: &[String], out: &mut RelayWriter) -> anyhow::Result<()> {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| anyhow::anyhow!("command registry is gone"))?;

        let mut listing = String::from("Available commands:\n");
        for name in registry.names().await {
            writeln!(listing, "  {}", name)?;
        }
        out.write_all(listing.as_bytes()).await?;
        Ok(())
    }
}
