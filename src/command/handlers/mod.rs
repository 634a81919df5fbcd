//! Handlers for the built-in commands

mod echo;
mod help;
mod system;

pub use echo::echo;
pub use help::Help;
pub use system::{uname, whoami};
