// src/summarize/mod.rs
//! Resilient wrapper around a single generative-text call.
//!
//! The backend's "overloaded" condition is expected and retried with
//! exponential backoff; everything else fails the call immediately. The wait
//! between attempts goes through the [`Sleeper`] seam so tests run instantly
//! and can record the requested delays.

pub mod gemini;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Input for one summarization: the announcement's source, link, and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub source: String,
    pub url: String,
    pub body: String,
}

/// Why a single backend attempt failed. Retry policy hinges on the variant.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend signalled temporary overload; worth retrying.
    #[error("backend overloaded: {0}")]
    Overloaded(String),
    /// Anything else: bad request, auth failure, network error.
    #[error("backend request failed: {0}")]
    Request(String),
}

impl BackendError {
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Overloaded(_))
    }
}

#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The backend rejected the request outright; retrying would not help.
    #[error("summarization rejected: {0}")]
    Fatal(#[source] BackendError),
    /// Every attempt saw a transient failure and the retry budget ran out.
    #[error("retry budget exhausted after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: BackendError,
    },
}

/// One remote generate call. Implementations classify their own failures as
/// transient or fatal via [`BackendError`]; the wrapper never inspects the
/// produced text.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, BackendError>;
    /// Backend name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Suspension seam for the backoff wait.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry loop state. `Waiting` is the only suspension point.
enum RetryState {
    Attempting { attempt: u32 },
    Waiting { next_attempt: u32, delay: Duration, last: BackendError },
    Succeeded(String),
    FatalFailed(BackendError),
    Exhausted { attempts: u32, last: BackendError },
}

/// Retry/backoff wrapper around a [`SummaryBackend`].
///
/// Defaults: 20s per-attempt timeout (elapsing counts as transient), 6
/// retries beyond the first attempt, and a 10s base delay doubling before
/// each retry (10, 20, 40, 80, 160, 320s).
pub struct Summarizer<B> {
    backend: B,
    sleeper: Arc<dyn Sleeper>,
    attempt_timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
}

impl<B: SummaryBackend> Summarizer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sleeper: Arc::new(TokioSleeper),
            attempt_timeout: Duration::from_secs(20),
            max_retries: 6,
            base_delay: Duration::from_secs(10),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Produce a summary, retrying transient backend failures. The returned
    /// text is the backend's output unmodified.
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<String, SummarizeError> {
        let mut state = RetryState::Attempting { attempt: 1 };
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    tracing::info!(
                        source = %request.source,
                        attempt,
                        backend = self.backend.name(),
                        "summarizing"
                    );
                    let outcome =
                        tokio::time::timeout(self.attempt_timeout, self.backend.generate(request))
                            .await;
                    match outcome {
                        Ok(Ok(text)) => RetryState::Succeeded(text),
                        Ok(Err(err)) => self.after_failure(attempt, err),
                        Err(_) => self.after_failure(
                            attempt,
                            BackendError::Overloaded(format!(
                                "attempt timed out after {:?}",
                                self.attempt_timeout
                            )),
                        ),
                    }
                }
                RetryState::Waiting { next_attempt, delay, last } => {
                    tracing::warn!(
                        source = %request.source,
                        next_attempt,
                        delay_secs = delay.as_secs(),
                        error = %last,
                        "backend overloaded, backing off"
                    );
                    self.sleeper.sleep(delay).await;
                    RetryState::Attempting { attempt: next_attempt }
                }
                RetryState::Succeeded(text) => return Ok(text),
                RetryState::FatalFailed(err) => return Err(SummarizeError::Fatal(err)),
                RetryState::Exhausted { attempts, last } => {
                    return Err(SummarizeError::Exhausted { attempts, last })
                }
            };
        }
    }

    fn after_failure(&self, attempt: u32, err: BackendError) -> RetryState {
        if !err.is_transient() {
            return RetryState::FatalFailed(err);
        }
        if attempt > self.max_retries {
            return RetryState::Exhausted { attempts: attempt, last: err };
        }
        // Delay before retry k is base * 2^(k-1); no jitter.
        let delay = self.base_delay * 2u32.pow(attempt - 1);
        RetryState::Waiting { next_attempt: attempt + 1, delay, last: err }
    }
}
