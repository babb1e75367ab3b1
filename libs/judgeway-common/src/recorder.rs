/// Submission Recorder contract
///
/// The execution core never persists anything. Callers that want a
/// history of submissions hand each normalized result to a
/// `SubmissionRecorder` after `execute` returns.
use crate::languages;
use crate::types::{ExecutionRequest, ExecutionResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SubmissionId = Uuid;

/// Who submitted what, as far as the caller knows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionContext {
    pub user_id: Option<String>,
    pub question_id: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: SubmissionId,
    pub context: SubmissionContext,
    pub language_id: u32,
    pub language: String,
    pub source_code: String,
    pub stdin: Option<String>,
    pub result: ExecutionResult,
    pub recorded_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(
        context: &SubmissionContext,
        request: &ExecutionRequest,
        result: &ExecutionResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            context: context.clone(),
            language_id: request.language_id,
            language: languages::display_name(request.language_id).to_string(),
            source_code: request.source_code.clone(),
            stdin: request.stdin.clone(),
            result: result.clone(),
            recorded_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait SubmissionRecorder: Send + Sync {
    /// Persist one execution and return the id it was stored under
    async fn record(
        &self,
        context: &SubmissionContext,
        request: &ExecutionRequest,
        result: &ExecutionResult,
    ) -> Result<SubmissionId, RecorderError>;

    async fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RecorderError>;

    /// Ids recorded for a user, oldest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<SubmissionId>, RecorderError>;
}
