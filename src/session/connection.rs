//! A single client session

use crate::config::ShellConfig;
use anyhow::{bail, Result};
use ntsh_core::Dispatcher;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::io::{
    split, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
    ReadHalf, WriteHalf,
};
use tracing::debug;

/// One connected client
pub struct Session<S, W> {
    source: String,
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    dispatcher: Arc<Dispatcher<W>>,
    config: Arc<ShellConfig>,
}

impl<S, W> Session<S, W>
where
    S: AsyncRead + AsyncWrite + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    /// Create a session over `stream`; `source` names the client in the log
    pub fn new(
        stream: S,
        source: String,
        dispatcher: Arc<Dispatcher<W>>,
        config: Arc<ShellConfig>,
    ) -> Self {
        let (reader, writer) = split(stream);
        Self {
            source,
            reader: BufReader::new(reader),
            writer,
            dispatcher,
            config,
        }
    }

    /// Serve lines until the client disconnects.
    ///
    /// Returns the number of lines read. A line longer than
    /// `max_line_len` ends the session with an error.
    pub async fn run(mut self) -> Result<u64> {
        self.writer.write_all(self.config.banner.as_bytes()).await?;

        let limit = self.config.max_line_len;
        let mut buf = Vec::new();
        let mut lines = 0u64;
        loop {
            self.writer.write_all(self.config.prompt.as_bytes()).await?;
            self.writer.flush().await?;

            buf.clear();
            let n = (&mut self.reader)
                .take(limit as u64)
                .read_until(b'\n', &mut buf)
                .await?;
            if n == 0 {
                break;
            }
            if n == limit && buf.last() != Some(&b'\n') {
                bail!("{}: line exceeds {} bytes", self.source, limit);
            }
            lines += 1;

            debug!("{}: read {} bytes", self.source, n);
            let line = decode_line(&buf);
            self.dispatcher
                .run(&line, &self.source, self.config.ding())
                .await?;
        }

        Ok(lines)
    }
}

/// Strip the line terminator and decode, replacing invalid UTF-8
fn decode_line(buf: &[u8]) -> Cow<'_, str> {
    let mut end = buf.len();
    while end > 0 && matches!(buf[end - 1], b'\n' | b'\r') {
        end -= 1;
    }
    String::from_utf8_lossy(&buf[..end])
}
