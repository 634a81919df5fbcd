//! Shell configuration

use ntsh_core::BELL;

/// Runtime settings for the shell front end
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Address the TCP listener binds to
    pub listen_addr: String,
    /// Sent to a client when its session opens
    pub banner: String,
    /// Sent to a client before each line is read
    pub prompt: String,
    /// Prefix every logged invocation with an ASCII bell
    pub bell: bool,
    /// Longest accepted input line in bytes, terminator included
    pub max_line_len: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:2323".into(),
            banner: "Ubuntu 14.04.2 LTS\n".into(),
            prompt: "$ ".into(),
            bell: false,
            max_line_len: 4096,
        }
    }
}

impl ShellConfig {
    /// Apply command-line and environment overrides.
    ///
    /// `listen_addr` is the first positional argument, `bell` the value of
    /// `NTSH_BELL`.
    pub fn with_overrides(mut self, listen_addr: Option<String>, bell: Option<&str>) -> Self {
        if let Some(addr) = listen_addr {
            self.listen_addr = addr;
        }
        if let Some(value) = bell {
            self.bell = matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        self
    }

    /// Alert prefix passed to the dispatcher with every line
    pub fn ding(&self) -> &'static str {
        if self.bell {
            BELL
        } else {
            ""
        }
    }
}
