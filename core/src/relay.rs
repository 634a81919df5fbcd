//! Per-invocation output relay
//!
//! A relay is a bounded one-way byte pipe. The writer end is handed to a
//! handler and implements [`AsyncWrite`]; the reader end is drained by a
//! spawned copy task into the shared output sink:
//! ```text
//! handler --write--> RelayWriter ==[RELAY_CAPACITY]==> copy task --write_all--> sink
//! ```
//! Writes wait once `RELAY_CAPACITY` bytes are buffered and the copy task has
//! not caught up. Dropping the writer closes the pipe; the copy task then
//! drains what is left and finishes, reporting how many bytes it copied.

use bytes::BytesMut;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt, DuplexStream};
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};

/// Bytes the pipe buffers before writes wait on the copy task
pub const RELAY_CAPACITY: usize = 8 * 1024;

/// Largest chunk the copy task moves to the sink at once
pub const COPY_CHUNK: usize = 4096;

/// Errors surfaced when joining a relay's copy task
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("output write failed: {0}")]
    Output(#[from] io::Error),

    #[error("relay copy task aborted: {0}")]
    Aborted(#[from] JoinError),
}

/// Writer end of a relay
pub struct RelayWriter {
    inner: DuplexStream,
    written: u64,
}

impl RelayWriter {
    /// Bytes accepted by this writer so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Close the writer end, signalling end of output to the copy task
    pub fn close(self) {}
}

impl AsyncWrite for RelayWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let poll = Pin::new(&mut self.inner).poll_write(cx, buf);
        if let Poll::Ready(Ok(n)) = &poll {
            self.written += *n as u64;
        }
        poll
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

/// Reader end of a relay, owned by the running copy task
pub struct RelayTask {
    handle: JoinHandle<Result<u64, RelayError>>,
}

impl RelayTask {
    /// Wait for the copy task to drain the pipe.
    ///
    /// Only completes once the [`RelayWriter`] has been dropped. Returns the
    /// number of bytes copied to the sink.
    pub async fn finish(self) -> Result<u64, RelayError> {
        self.handle.await?
    }
}

/// Open a relay whose output is copied into `sink`.
///
/// Must be called from within a tokio runtime.
pub fn open<W>(sink: Arc<Mutex<W>>) -> (RelayWriter, RelayTask)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (writer, mut reader) = tokio::io::duplex(RELAY_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut buf = BytesMut::with_capacity(COPY_CHUNK);
        let mut copied = 0u64;
        loop {
            buf.clear();
            // Closed writer and drained pipe
            if (&mut reader).take(COPY_CHUNK as u64).read_buf(&mut buf).await? == 0 {
                break;
            }
            let mut out = sink.lock().await;
            out.write_all(&buf).await?;
            out.flush().await?;
            copied += buf.len() as u64;
        }
        Ok::<u64, RelayError>(copied)
    });

    (
        RelayWriter {
            inner: writer,
            written: 0,
        },
        RelayTask { handle },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// Sink whose every write fails
    struct BrokenSink;

    impl AsyncWrite for BrokenSink {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink gone")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Sink that never accepts a byte
    struct StalledSink;

    impl AsyncWrite for StalledSink {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Pending
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Pending
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Pending
        }
    }

    #[tokio::test]
    async fn test_relay_copies_everything_before_close() {
        let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
        let (mut writer, task) = open(sink.clone());

        writer.write_all(b"hello ").await.unwrap();
        writer.write_all(b"world\n").await.unwrap();
        assert_eq!(writer.written(), 12);
        writer.close();

        let copied = task.finish().await.unwrap();
        assert_eq!(copied, 12);
        assert_eq!(sink.lock().await.as_slice(), b"hello world\n");
    }

    #[tokio::test]
    async fn test_relay_without_writes_finishes() {
        let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
        let (writer, task) = open(sink.clone());
        drop(writer);

        assert_eq!(task.finish().await.unwrap(), 0);
        assert!(sink.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_output_larger_than_pipe_arrives_intact() {
        let sink = Arc::new(Mutex::new(Vec::<u8>::new()));
        let (mut writer, task) = open(sink.clone());
        let data: Vec<u8> = (0..RELAY_CAPACITY * 16).map(|i| (i % 251) as u8).collect();

        writer.write_all(&data).await.unwrap();
        writer.close();

        assert_eq!(task.finish().await.unwrap(), data.len() as u64);
        assert_eq!(*sink.lock().await, data);
    }

    #[tokio::test]
    async fn test_stalled_sink_bounds_buffered_output() {
        let sink = Arc::new(Mutex::new(StalledSink));
        let (mut writer, _task) = open(sink);
        let data = vec![b'y'; RELAY_CAPACITY * 8];

        let res = tokio::time::timeout(Duration::from_millis(100), writer.write_all(&data)).await;

        assert!(res.is_err(), "write should wait on a stalled sink");
        // At most one full pipe plus the chunk stuck in the copy task
        assert!(writer.written() <= (RELAY_CAPACITY + COPY_CHUNK) as u64);
        assert!(writer.written() >= RELAY_CAPACITY as u64);
    }

    #[tokio::test]
    async fn test_broken_sink_reports_error_and_closes_pipe() {
        let sink = Arc::new(Mutex::new(BrokenSink));
        let (mut writer, task) = open(sink);

        writer.write_all(b"lost").await.unwrap();

        match task.finish().await {
            Err(RelayError::Output(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected relay result: {:?}", other.map(|_| ())),
        }

        let err = writer.write_all(b"more").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
