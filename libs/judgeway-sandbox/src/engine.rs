/// Execution Client - submit and poll
///
/// **Core Responsibility:**
/// Run one source + input pair in the remote sandbox and return a
/// normalized result.
///
/// **Algorithm:**
/// 1. Submit in non-blocking mode and obtain a token
/// 2. Sleep the poll interval, fetch status by token
/// 3. Stop on a terminal outcome, or when the attempt budget runs out
///
/// **Exit conditions:**
/// - Terminal outcome: returned as-is
/// - Budget exhausted: the last non-terminal result is returned, not an error
/// - Transport failure on submit or poll: surfaced immediately, never retried
///
/// The client holds no mutable state; clones share the transport and can
/// run concurrently from independent tasks.
use crate::error::TransportError;
use crate::normalize::normalize;
use crate::transport::{HttpTransport, SandboxTransport};
use async_trait::async_trait;
use judgeway_common::config::SandboxConfig;
use judgeway_common::languages::{self, LanguageDescriptor};
use judgeway_common::types::{ExecutionRequest, ExecutionResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Suspends the polling task between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Cooperative sleep on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Poll cadence and attempt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    /// `max_attempts` is clamped to at least one poll
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 30)
    }
}

impl From<&SandboxConfig> for PollPolicy {
    fn from(config: &SandboxConfig) -> Self {
        Self::new(config.poll_interval, config.max_poll_attempts)
    }
}

#[derive(Clone)]
pub struct ExecutionClient {
    transport: Arc<dyn SandboxTransport>,
    sleeper: Arc<dyn Sleeper>,
    policy: PollPolicy,
}

impl ExecutionClient {
    pub fn new(transport: Arc<dyn SandboxTransport>, policy: PollPolicy) -> Self {
        Self::with_sleeper(transport, Arc::new(TokioSleeper), policy)
    }

    pub fn with_sleeper(
        transport: Arc<dyn SandboxTransport>,
        sleeper: Arc<dyn Sleeper>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    /// Production client: HTTP transport and tokio sleep, configured from
    /// `SandboxConfig`
    pub fn from_config(config: &SandboxConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), PollPolicy::from(config)))
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Submit one request and poll until it finishes or the budget runs out
    ///
    /// A result whose outcome is still `Queued` or `Processing` means the
    /// budget was exhausted before the sandbox finished.
    #[instrument(skip(self, request), fields(language_id = request.language_id))]
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, TransportError> {
        let token = self.transport.submit(request).await?;
        debug!(token = %token, "Submitted, polling for result");

        let mut attempts = 0u32;
        loop {
            self.sleeper.sleep(self.policy.interval).await;

            let raw = self.transport.fetch(&token).await?;
            attempts += 1;

            let result = normalize(&raw, &token);

            if result.is_terminal() {
                info!(
                    token = %token,
                    attempts,
                    outcome = %result.outcome,
                    elapsed_seconds = ?result.elapsed_seconds,
                    "Execution finished"
                );
                return Ok(result);
            }

            if attempts >= self.policy.max_attempts {
                warn!(
                    token = %token,
                    attempts,
                    outcome = %result.outcome,
                    "Poll budget exhausted before a terminal status"
                );
                return Ok(result);
            }

            debug!(token = %token, attempts, outcome = %result.outcome, "Still running");
        }
    }

    /// Registry languages the sandbox reports as available
    ///
    /// Falls back to the full static list when the sandbox cannot be asked.
    pub async fn available_languages(&self) -> Vec<&'static LanguageDescriptor> {
        match self.transport.languages().await {
            Ok(remote) => languages::list_all()
                .iter()
                .filter(|lang| remote.iter().any(|r| r.id == lang.id))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Failed to fetch sandbox languages, using static list");
                languages::list_all().iter().collect()
            }
        }
    }
}
