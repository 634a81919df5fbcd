//! ntsh core
//!
//! The command registry and line dispatcher behind the "Nice Try" shell.
//! Front ends feed raw lines to a [`Dispatcher`]; command modules bind
//! [`Handler`]s to names in a [`Registry`] before dispatch begins.

pub mod dispatcher;
pub mod handler;
pub mod logging;
pub mod registry;
pub mod relay;

#[cfg(test)]
mod test_support;

pub use dispatcher::{CommandLine, Dispatcher, BELL, REJECTION};
pub use handler::{handler_fn, FnHandler, Handler};
pub use logging::AuditFields;
pub use registry::Registry;
pub use relay::{RelayError, RelayTask, RelayWriter};
