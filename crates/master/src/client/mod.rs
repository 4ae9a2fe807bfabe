//! # File system master client
//!
//! Worker-side wrapper around the master's file system service. Calls are
//! serialised over one logical connection and retried with exponential
//! backoff when the connection drops.

mod types;

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use rand::Rng;
use strata_core::{Configuration, Result, RetryConfig};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub use types::{CommandType, FileInfo, FileSystemCommand};

const SERVICE_NAME: &str = "FileSystemMasterWorker";
const SERVICE_VERSION: u64 = 1;

/// Transport-level view of the master's file system service.
///
/// Implementations report a dropped or refused connection as
/// `Error::ConnectionFailed`; the client retries only those.
#[async_trait]
pub trait FileSystemMasterService: Send + Sync {
    /// Open (or reopen) the connection to the master.
    async fn connect(&self, address: SocketAddr) -> Result<()>;

    async fn file_info(&self, file_id: i64) -> Result<FileInfo>;

    /// Ids of pinned files.
    async fn pin_list(&self) -> Result<HashSet<i64>>;

    /// Report liveness and newly persisted files; returns the master's next command.
    async fn heartbeat(
        &self,
        worker_id: i64,
        persisted_files: Vec<i64>,
    ) -> Result<FileSystemCommand>;
}

#[derive(Debug, Default)]
struct ConnectionState {
    connected: bool,
}

/// Retrying, serialised client for a [`FileSystemMasterService`].
#[derive(Debug)]
pub struct FileSystemMasterClient<S> {
    service: S,
    address: SocketAddr,
    retry: RetryConfig,
    state: Mutex<ConnectionState>,
}

impl<S: FileSystemMasterService> FileSystemMasterClient<S> {
    pub fn new(service: S, address: SocketAddr, retry: RetryConfig) -> Self {
        Self {
            service,
            address,
            retry,
            state: Mutex::new(ConnectionState::default()),
        }
    }

    /// Create a client from the master address and retry policy in `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration does not validate.
    pub fn from_config(service: S, config: &Configuration) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(service, config.master_socket_addr()?, config.retry))
    }

    #[must_use]
    pub const fn service_name() -> &'static str {
        SERVICE_NAME
    }

    #[must_use]
    pub const fn service_version() -> u64 {
        SERVICE_VERSION
    }

    #[must_use]
    pub const fn address(&self) -> SocketAddr {
        self.address
    }

    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.connected
    }

    /// Drop the connection; the next call reconnects.
    pub async fn close(&self) {
        self.state.lock().await.connected = false;
    }

    /// # Errors
    ///
    /// Returns the service error, after retries if it was a connection failure.
    pub async fn file_info(&self, file_id: i64) -> Result<FileInfo> {
        self.retry_rpc("file_info", |service| service.file_info(file_id))
            .await
    }

    /// # Errors
    ///
    /// Returns the service error, after retries if it was a connection failure.
    pub async fn pin_list(&self) -> Result<HashSet<i64>> {
        self.retry_rpc("pin_list", |service| service.pin_list()).await
    }

    /// # Errors
    ///
    /// Returns the service error, after retries if it was a connection failure.
    pub async fn heartbeat(
        &self,
        worker_id: i64,
        persisted_files: &[i64],
    ) -> Result<FileSystemCommand> {
        self.retry_rpc("heartbeat", |service| {
            service.heartbeat(worker_id, persisted_files.to_vec())
        })
        .await
    }

    async fn ensure_connected(&self, state: &mut ConnectionState) -> Result<()> {
        if state.connected {
            return Ok(());
        }
        debug!(service = SERVICE_NAME, address = %self.address, "connecting to master");
        self.service.connect(self.address).await?;
        state.connected = true;
        Ok(())
    }

    async fn retry_rpc<R, F>(&self, method: &'static str, call: F) -> Result<R>
    where
        F: for<'s> Fn(&'s S) -> BoxFuture<'s, Result<R>>,
    {
        let mut state = self.state.lock().await;
        let mut attempt: u32 = 0;

        loop {
            let outcome = match self.ensure_connected(&mut state).await {
                Ok(()) => call(&self.service).await,
                Err(e) => Err(e),
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() => e,
                Err(e) => return Err(e),
            };

            state.connected = false;
            attempt = attempt.saturating_add(1);
            if attempt >= self.retry.max_attempts {
                warn!(
                    service = SERVICE_NAME,
                    method,
                    attempts = attempt,
                    error = %err,
                    "giving up on master RPC"
                );
                return Err(err);
            }

            let delay = self.delay_before_retry(attempt.saturating_sub(1));
            warn!(
                service = SERVICE_NAME,
                method,
                attempt,
                max_attempts = self.retry.max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "master RPC failed, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    fn delay_before_retry(&self, retry: u32) -> Duration {
        let jitter_ms = if self.retry.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.retry.jitter_ms)
        };
        self.retry
            .backoff(retry)
            .saturating_add(Duration::from_millis(jitter_ms))
    }
}
