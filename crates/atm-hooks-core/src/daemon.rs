//! Best-effort delivery of lifecycle events to the team daemon.
//!
//! The daemon listens on a Unix domain socket at:
//!
//! ```text
//! ${ATM_HOME}/.claude/daemon/atm-daemon.sock
//! ```
//!
//! One newline-terminated JSON request is written per connection:
//!
//! ```json
//! {"version":1,"request_id":"<uuid>","command":"hook-event","payload":{"event":"session_start",...}}
//! ```
//!
//! Whatever the daemon answers is read (up to 4 KiB) and thrown away. Every
//! step is bounded by the client timeout and every failure is dropped: the
//! audit log is the record, the daemon is only a live view.

use crate::error::{HookError, Outcome, Result};
use crate::event::LifecycleEvent;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Protocol version for the socket JSON protocol.
pub const PROTOCOL_VERSION: u32 = 1;
pub const HOOK_EVENT_COMMAND: &str = "hook-event";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

const RESPONSE_DRAIN_BYTES: usize = 4096;

/// A request sent to the daemon over the Unix socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketRequest {
    pub version: u32,
    /// Fresh per request.
    pub request_id: String,
    pub command: String,
    pub payload: serde_json::Value,
}

impl SocketRequest {
    pub fn hook_event(event: &LifecycleEvent) -> serde_json::Result<Self> {
        Ok(Self {
            version: PROTOCOL_VERSION,
            request_id: uuid::Uuid::new_v4().to_string(),
            command: HOOK_EVENT_COMMAND.to_string(),
            payload: event.daemon_payload()?,
        })
    }

    /// Compact JSON plus the terminating newline.
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// What happened to a send. Informational only; no variant is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No socket on disk: the daemon is not running.
    NotRunning,
    /// The request was written to the socket.
    Sent,
    /// Connecting or writing failed, or the platform has no unix sockets,
    /// and the event was dropped.
    Dropped,
}

#[derive(Debug, Clone)]
pub struct DaemonClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn under_home(home: &Path) -> Self {
        Self::new(paths::daemon_socket_path(home))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send `event` as a `hook-event` request, blocking for at most a few
    /// timeouts. Must not be called from inside a tokio runtime; use
    /// [`DaemonClient::send_async`] there.
    pub fn send(&self, event: &LifecycleEvent) -> Delivery {
        if !self.socket_path.exists() {
            return Delivery::NotRunning;
        }
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::debug!(error = %e, "could not start runtime for daemon send");
                return Delivery::Dropped;
            }
        };
        runtime.block_on(self.send_async(event))
    }

    pub async fn send_async(&self, event: &LifecycleEvent) -> Delivery {
        if !self.socket_path.exists() {
            return Delivery::NotRunning;
        }
        match self.try_send(event).await {
            Ok(()) => Delivery::Sent,
            Err(_) => Delivery::Dropped,
        }
    }

    async fn try_send(&self, event: &LifecycleEvent) -> Outcome<()> {
        let line = SocketRequest::hook_event(event)?.to_line()?;
        self.exchange(line.as_bytes()).await?;
        tracing::debug!(
            event = event.kind.as_str(),
            socket = %self.socket_path.display(),
            "hook event sent"
        );
        Ok(())
    }

    #[cfg(unix)]
    async fn exchange(&self, request: &[u8]) -> Result<()> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::UnixStream;
        use tokio::time::timeout;

        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .map_err(|_| HookError::Timeout("connect"))??;

        timeout(self.timeout, stream.write_all(request))
            .await
            .map_err(|_| HookError::Timeout("write"))??;

        // Drain the reply so the daemon never writes into a closed socket.
        // Its content is never interpreted and a slow reply is not a failure.
        let mut buf = [0u8; RESPONSE_DRAIN_BYTES];
        if let Ok(Err(e)) = timeout(self.timeout, stream.read(&mut buf)).await {
            tracing::debug!(error = %e, "daemon response read failed");
        }
        Ok(())
    }

    #[cfg(not(unix))]
    async fn exchange(&self, _request: &[u8]) -> Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "daemon socket requires unix domain sockets",
        )
        .into())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
