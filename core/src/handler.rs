//! Handler contract for registered commands

use crate::relay::RelayWriter;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// A command bound to a name in the [`Registry`](crate::Registry).
///
/// `name` is the token the user typed, `args` the remaining tokens. Output goes
/// to `out`; the dispatcher closes it once `call` returns, which ends the relay.
/// An `Err` is logged by the dispatcher and never reaches the caller of `run`.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, name: &str, args: &[String], out: &mut RelayWriter) -> anyhow::Result<()>;
}

/// Handler backed by a plain closure.
///
/// The closure writes into a buffer that is relayed once it returns, so it
/// suits commands with short output. Long-running or chatty commands should
/// implement [`Handler`] and write to the relay directly.
pub struct FnHandler<F> {
    f: F,
}

/// Wrap a synchronous closure as a [`Handler`]
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&str, &[String], &mut Vec<u8>) -> anyhow::Result<()> + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&str, &[String], &mut Vec<u8>) -> anyhow::Result<()> + Send + Sync,
{
    async fn call(&self, name: &str, args: &[String], out: &mut RelayWriter) -> anyhow::Result<()> {
        let mut buf = Vec::new();
        let result = (self.f)(name, args, &mut buf);
        // Output written before a failure is still relayed
        out.write_all(&buf).await?;
        result
    }
}
