//! Built-in commands for the shell
//!
//! This module handles:
//! - Binding the built-in handlers to their names
//! - Keeping that set in one place so `main` registers it before serving

pub mod handlers;

use ntsh_core::{handler_fn, Registry};
use std::sync::Arc;

/// Register every built-in command with `registry`
pub async fn register_builtins(registry: &Arc<Registry>) {
    registry.register("echo", handler_fn(handlers::echo)).await;
    registry.register("uname", handler_fn(handlers::uname)).await;
    registry.register("whoami", handler_fn(handlers::whoami)).await;
    registry
        .register("help", handlers::Help::new(Arc::downgrade(registry)))
        .await;
}
