//! Name to handler bindings

use crate::handler::Handler;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Maps command names to their handlers.
///
/// Populated once at startup, then shared by `Arc` with the dispatcher.
/// The lock guards map access only and is never held while a handler runs.
pub struct Registry {
    commands: Mutex<HashMap<String, Arc<dyn Handler>>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(HashMap::new()),
        }
    }

    /// Bind `handler` to `name`.
    ///
    /// # Panics
    ///
    /// If `name` is empty, contains whitespace (it could never be typed), or is
    /// already bound. All three are configuration bugs.
    pub async fn register<H>(&self, name: &str, handler: H)
    where
        H: Handler + 'static,
    {
        if name.is_empty() || name.contains(char::is_whitespace) {
            panic!("invalid command name {:?}", name);
        }

        let mut commands = self.commands.lock().await;
        if commands.contains_key(name) {
            panic!("{} already defined", name);
        }
        commands.insert(name.to_string(), Arc::new(handler));
    }

    /// Get the handler bound to `name`
    pub async fn lookup(&self, name: &str) -> Option<Arc<dyn Handler>> {
        self.commands.lock().await.get(name).cloned()
    }

    /// Registered names, sorted
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.lock().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered commands
    pub async fn len(&self) -> usize {
        self.commands.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
