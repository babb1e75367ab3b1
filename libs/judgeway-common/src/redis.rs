use crate::recorder::{
    RecorderError, SubmissionContext, SubmissionId, SubmissionRecord, SubmissionRecorder,
};
use crate::types::{ExecutionRequest, ExecutionResult};
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

/// Redis key layout for recorded submissions
/// Keys are deterministic so the API and any offline tooling agree on them

pub const SUBMISSION_PREFIX: &str = "judgeway:submission";
pub const USER_PREFIX: &str = "judgeway:user";

/// Key holding one submission record
pub fn submission_key(id: &SubmissionId) -> String {
    format!("{}:{}", SUBMISSION_PREFIX, id)
}

/// Key of the list of submission ids made by a user
pub fn user_submissions_key(user_id: &str) -> String {
    format!("{}:{}:submissions", USER_PREFIX, user_id)
}

/// Stores submission records as JSON with a TTL
#[derive(Clone)]
pub struct RedisSubmissionRecorder {
    conn: redis::aio::ConnectionManager,
    ttl_seconds: u64,
}

impl RedisSubmissionRecorder {
    pub fn new(conn: redis::aio::ConnectionManager, ttl_seconds: u64) -> Self {
        Self { conn, ttl_seconds }
    }

    pub async fn connect(redis_url: &str, ttl_seconds: u64) -> Result<Self, RecorderError> {
        let client = redis::Client::open(redis_url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self::new(conn, ttl_seconds))
    }
}

#[async_trait]
impl SubmissionRecorder for RedisSubmissionRecorder {
    async fn record(
        &self,
        context: &SubmissionContext,
        request: &ExecutionRequest,
        result: &ExecutionResult,
    ) -> Result<SubmissionId, RecorderError> {
        let record = SubmissionRecord::new(context, request, result);
        let payload = serde_json::to_string(&record)?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(submission_key(&record.id), payload, self.ttl_seconds as _)
            .await?;

        if let Some(user_id) = &context.user_id {
            let key = user_submissions_key(user_id);
            let _: () = conn.rpush(&key, record.id.to_string()).await?;
            let _: () = conn.expire(&key, self.ttl_seconds as _).await?;
        }

        debug!(submission_id = %record.id, token = %result.token, "Submission recorded");
        Ok(record.id)
    }

    async fn fetch(&self, id: &SubmissionId) -> Result<Option<SubmissionRecord>, RecorderError> {
        let mut conn = self.conn.clone();
        let payload: Option<String> = conn.get(submission_key(id)).await?;

        match payload {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<SubmissionId>, RecorderError> {
        let mut conn = self.conn.clone();
        let raw: Vec<String> = conn.lrange(user_submissions_key(user_id), 0, -1).await?;
        Ok(raw
            .iter()
            .filter_map(|id| uuid::Uuid::parse_str(id).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ExecutionOutcome;
    use crate::types::ExecutionToken;
    use uuid::Uuid;

    #[test]
    fn test_submission_key_deterministic() {
        let id = Uuid::new_v4();
        let key1 = submission_key(&id);
        let key2 = submission_key(&id);
        assert_eq!(key1, key2);
        assert!(key1.starts_with("judgeway:submission:"));
        assert!(key1.contains(&id.to_string()));
    }

    #[test]
    fn test_user_submissions_key_format() {
        assert_eq!(user_submissions_key("42"), "judgeway:user:42:submissions");
    }

    #[tokio::test]
    #[ignore] // Requires Redis
    async fn test_record_and_fetch_roundtrip() {
        let recorder = RedisSubmissionRecorder::connect("redis://127.0.0.1:6379", 60)
            .await
            .expect("Failed to connect to Redis");

        let context = SubmissionContext {
            user_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        };
        let request = ExecutionRequest::new("print(2+2)", 71);
        let result = ExecutionResult {
            outcome: ExecutionOutcome::Accepted,
            stdout: Some("4\n".to_string()),
            stderr: None,
            compile_output: None,
            message: None,
            elapsed_seconds: Some(0.25),
            memory_kb: Some(3100),
            token: ExecutionToken::new("redis-test"),
        };

        let id = recorder.record(&context, &request, &result).await.unwrap();
        let stored = recorder.fetch(&id).await.unwrap().expect("record stored");
        assert_eq!(stored.result, result);

        let ids = recorder
            .list_for_user(context.user_id.as_deref().unwrap())
            .await
            .unwrap();
        assert_eq!(ids, vec![id]);
    }
}
