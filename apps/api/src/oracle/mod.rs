//! Oracle Gateway — bounded-concurrency access to the external
//! text-generation capability, reused for three prompt roles.
//!
//! The capability itself is a trait (`Generate`) so the scheduler tests can
//! substitute doubles. The production implementation routes through
//! `llm_client::LlmClient`; no other module touches the Anthropic API.
//!
//! The gateway enforces a fixed cap on simultaneous in-flight calls (one
//! semaphore shared by both pipeline stages, independent of batch size) and a
//! per-call timeout. Errors come back as values — a failed call never
//! propagates a panic or an `Err` past a sibling document's task.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::llm_client::{LlmClient, LlmError};

pub mod prompts;

/// A single failed oracle call, tagged by cause. Local to one call; the
/// batch-level summarization failure is the only one treated as fatal, and
/// that policy lives in the scheduler, not here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleCallError {
    #[error("oracle rate limited")]
    RateLimited,

    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),

    #[error("oracle returned an unusable response: {0}")]
    MalformedResponse(String),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

/// The external text-generation capability: one prompt in, free text out.
/// Fallible, rate-limited, not guaranteed deterministic.
#[async_trait]
pub trait Generate: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, OracleCallError>;
}

/// Production oracle backed by the Anthropic Messages API.
pub struct AnthropicOracle {
    llm: LlmClient,
}

impl AnthropicOracle {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Generate for AnthropicOracle {
    async fn generate(&self, prompt: &str) -> Result<String, OracleCallError> {
        self.llm
            .complete(prompt, prompts::ORACLE_SYSTEM)
            .await
            .map_err(map_llm_error)
    }
}

/// Collapses transport-level failures into the gateway's tagged taxonomy.
fn map_llm_error(err: LlmError) -> OracleCallError {
    match err {
        LlmError::RateLimited { .. } => OracleCallError::RateLimited,
        LlmError::Api { status: 429, .. } => OracleCallError::RateLimited,
        LlmError::EmptyContent => {
            OracleCallError::MalformedResponse("empty completion".to_string())
        }
        LlmError::Api { status, message } => {
            OracleCallError::Unavailable(format!("API status {status}: {message}"))
        }
        LlmError::Http(e) => OracleCallError::Unavailable(e.to_string()),
    }
}

/// The oracle's digest of the job description. Computed once per batch and
/// shared read-only by every scoring call in that batch.
#[derive(Debug, Clone)]
pub struct JobSummary {
    text: String,
}

impl JobSummary {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Bounded-concurrency wrapper around a `Generate` implementation.
/// Excess calls queue on the semaphore rather than fail.
#[derive(Clone)]
pub struct OracleGateway {
    oracle: Arc<dyn Generate>,
    permits: Arc<Semaphore>,
    call_timeout: Duration,
}

impl OracleGateway {
    pub fn new(oracle: Arc<dyn Generate>, max_in_flight: usize, call_timeout: Duration) -> Self {
        Self {
            oracle,
            permits: Arc::new(Semaphore::new(max_in_flight)),
            call_timeout,
        }
    }

    /// One call per batch. The scheduler treats a failure here as fatal to
    /// the whole batch.
    pub async fn summarize_job_description(
        &self,
        job_text: &str,
    ) -> Result<JobSummary, OracleCallError> {
        let prompt = prompts::JOB_SUMMARY_PROMPT.replace("{job_description_text}", job_text);
        self.call(prompt).await.map(JobSummary::new)
    }

    /// One call per document, stage 1.
    pub async fn extract_aspects(&self, document_text: &str) -> Result<String, OracleCallError> {
        let prompt = prompts::ASPECT_PROMPT.replace("{resume_text}", document_text);
        self.call(prompt).await
    }

    /// One call per document, stage 2. Depends on that document's own aspect
    /// extraction plus the shared summary.
    pub async fn score_against_job(
        &self,
        aspects_text: &str,
        summary: &JobSummary,
    ) -> Result<String, OracleCallError> {
        let prompt = prompts::SCORE_PROMPT
            .replace("{resume_aspects}", aspects_text)
            .replace("{job_summary}", summary.as_str());
        self.call(prompt).await
    }

    async fn call(&self, prompt: String) -> Result<String, OracleCallError> {
        let _permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| OracleCallError::Unavailable("gateway closed".to_string()))?;

        debug!(
            "oracle call dispatched ({} permits left)",
            self.permits.available_permits()
        );

        match tokio::time::timeout(self.call_timeout, self.oracle.generate(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(OracleCallError::Timeout(self.call_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Echoes every prompt back, so tests can observe interpolation.
    struct EchoOracle;

    #[async_trait]
    impl Generate for EchoOracle {
        async fn generate(&self, prompt: &str) -> Result<String, OracleCallError> {
            Ok(prompt.to_string())
        }
    }

    fn gateway() -> OracleGateway {
        OracleGateway::new(Arc::new(EchoOracle), 2, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_summary_prompt_interpolates_job_text() {
        let summary = gateway()
            .summarize_job_description("Senior Rust engineer, distributed systems")
            .await
            .unwrap();
        assert!(summary.as_str().contains("Senior Rust engineer"));
        assert!(!summary.as_str().contains("{job_description_text}"));
    }

    #[tokio::test]
    async fn test_score_prompt_carries_both_inputs() {
        let gw = gateway();
        let summary = JobSummary::new("needs: Rust".to_string());
        let prompt = gw
            .score_against_job("aspects: five years Rust", &summary)
            .await
            .unwrap();
        assert!(prompt.contains("aspects: five years Rust"));
        assert!(prompt.contains("needs: Rust"));
        assert!(!prompt.contains("{resume_aspects}"));
        assert!(!prompt.contains("{job_summary}"));
    }

    #[test]
    fn test_llm_error_mapping() {
        assert_eq!(
            map_llm_error(LlmError::RateLimited { retries: 3 }),
            OracleCallError::RateLimited
        );
        assert_eq!(
            map_llm_error(LlmError::Api {
                status: 429,
                message: "slow down".to_string()
            }),
            OracleCallError::RateLimited
        );
        assert_eq!(
            map_llm_error(LlmError::EmptyContent),
            OracleCallError::MalformedResponse("empty completion".to_string())
        );
        assert!(matches!(
            map_llm_error(LlmError::Api {
                status: 500,
                message: "boom".to_string()
            }),
            OracleCallError::Unavailable(_)
        ));
    }
}
