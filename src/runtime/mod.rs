//! TCP and timer primitives for the bundled [`crate::HttpClient`].
//!
//! Exactly one backend is compiled in, picked by cargo feature:
//! `runtime-tokio` (the default), `runtime-async-std` or `runtime-smol`.
//! Switching backends means turning off the default features:
//!
//! ```toml
//! [dependencies]
//! hue-bridge-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! ```
//!
//! Callers that bring their own [`crate::HttpTransport`] still need one
//! backend enabled, but never touch this module.

use std::future::Future;
use std::io;
use std::time::Duration;

#[cfg(feature = "runtime-async-std")]
mod async_std_impl;
#[cfg(feature = "runtime-smol")]
mod smol_impl;
#[cfg(feature = "runtime-tokio")]
mod tokio_impl;

#[cfg(feature = "runtime-async-std")]
pub use async_std_impl::TcpStream;
#[cfg(feature = "runtime-smol")]
pub use smol_impl::TcpStream;
#[cfg(feature = "runtime-tokio")]
pub use tokio_impl::TcpStream;

#[cfg(feature = "runtime-async-std")]
use async_std_impl::timeout_impl;
#[cfg(feature = "runtime-smol")]
use smol_impl::timeout_impl;
#[cfg(feature = "runtime-tokio")]
use tokio_impl::timeout_impl;

/// A connected byte stream, one per HTTP exchange.
pub trait AsyncTcpStream: Send + Sized {
    /// Open a connection to `host:port`.
    fn connect(addr: &str) -> impl Future<Output = io::Result<Self>> + Send;

    /// Send all of `buf` and flush.
    fn write_all(&mut self, buf: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    /// Read whatever is available into `buf`; `Ok(0)` once the peer closed.
    fn read(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;
}

/// The deadline passed before the wrapped future finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline of the async operation elapsed")]
pub struct TimedOut;

/// Drive `future` to completion unless `duration` elapses first.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    timeout_impl(duration, future).await
}

#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-async-std",
    feature = "runtime-smol"
)))]
compile_error!("enable one runtime feature: runtime-tokio, runtime-async-std or runtime-smol");

#[cfg(any(
    all(feature = "runtime-tokio", feature = "runtime-async-std"),
    all(feature = "runtime-tokio", feature = "runtime-smol"),
    all(feature = "runtime-async-std", feature = "runtime-smol"),
))]
compile_error!("runtime features are mutually exclusive; enable only one");
