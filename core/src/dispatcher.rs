//! Line dispatcher - tokenizes input and runs the matching handler

use crate::registry::Registry;
use crate::relay;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Written to the output when the first token names no command
pub const REJECTION: &str = "Nice Try!\n";

/// Alert prefix for log lines (ASCII BEL)
pub const BELL: &str = "\x07";

/// A tokenized input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Split `line` on runs of whitespace. No quoting or escaping.
    ///
    /// Returns `None` for blank input.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace().map(str::to_string);
        let name = tokens.next()?;
        Some(Self {
            name,
            args: tokens.collect(),
        })
    }
}

/// Turns input lines into handler invocations.
///
/// At most one invocation runs at a time per dispatcher: the execution turn is
/// held from lookup until the handler has returned and its output relay has
/// drained. Callers from different sessions queue on it. A handler that never
/// returns stalls every caller.
pub struct Dispatcher<W = Stdout> {
    registry: Arc<Registry>,
    output: Arc<Mutex<W>>,
    turn: Mutex<()>,
}

impl Dispatcher<Stdout> {
    /// Dispatcher writing to the process's standard output
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_output(registry, Arc::new(Mutex::new(tokio::io::stdout())))
    }
}

impl<W> Dispatcher<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Dispatcher writing to `output`
    pub fn with_output(registry: Arc<Registry>, output: Arc<Mutex<W>>) -> Self {
        Self {
            registry,
            output,
            turn: Mutex::new(()),
        }
    }

    /// Run one line of input.
    ///
    /// `source` identifies the caller (e.g. a peer address) and `ding` is either
    /// empty or an alert prefix such as [`BELL`]; both only appear in the log.
    /// The ding travels in the event's `ding` field so that
    /// [`AuditFields`](crate::AuditFields) can write it unescaped.
    /// Unknown commands and handler failures are logged, not returned.
    pub async fn run(&self, line: &str, source: &str, ding: &str) -> anyhow::Result<()> {
        let Some(cmd) = CommandLine::parse(line) else {
            return Ok(());
        };

        let _turn = self.turn.lock().await;

        let Some(handler) = self.registry.lookup(&cmd.name).await else {
            self.reject(source).await;
            warn!("{}!: Unable to find command {:?}", source, line);
            return Ok(());
        };

        let (mut writer, relay) = relay::open(self.output.clone());

        info!(ding = ding, "{}: {:?}", source, line);

        let result = handler.call(&cmd.name, &cmd.args, &mut writer).await;
        let written = writer.written();
        writer.close();

        if let Err(e) = result {
            warn!("{}: {} failed: {:#}", source, cmd.name, e);
        }

        match relay.finish().await {
            Ok(copied) => debug!("{}: relayed {}/{} bytes", cmd.name, copied, written),
            Err(e) => error!("{}: output relay for {} failed: {}", source, cmd.name, e),
        }

        Ok(())
    }

    async fn reject(&self, source: &str) {
        let mut out = self.output.lock().await;
        let res = async {
            out.write_all(REJECTION.as_bytes()).await?;
            out.flush().await
        }
        .await;
        if let Err(e) = res {
            error!("{}: failed to write rejection: {}", source, e);
        }
    }
}
