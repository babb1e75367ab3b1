// Scripted sandbox doubles for unit tests

use crate::engine::Sleeper;
use crate::error::{Stage, TransportError};
use crate::transport::SandboxTransport;
use crate::wire::{SandboxLanguage, StatusField, SubmissionStatus};
use async_trait::async_trait;
use judgeway_common::types::{ExecutionRequest, ExecutionToken};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A bare status response with the given id
pub fn status(id: i64) -> SubmissionStatus {
    SubmissionStatus {
        status: StatusField {
            id,
            description: String::new(),
        },
        stdout: None,
        stderr: None,
        compile_output: None,
        message: None,
        time: None,
        memory: None,
        token: None,
    }
}

/// Accepted with the given stdout
pub fn accepted(stdout: &str) -> SubmissionStatus {
    let mut status = status(3);
    status.stdout = Some(stdout.to_string());
    status.time = Some("0.010".to_string());
    status.memory = Some(2048);
    status
}

fn unavailable(stage: Stage) -> TransportError {
    TransportError::Status {
        stage,
        status: 503,
        body: "sandbox unavailable".to_string(),
    }
}

/// Replays poll responses in order, one per fetch
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<SubmissionStatus>>,
    repeat: Option<SubmissionStatus>,
    fail_all_submits: bool,
    fail_submit_calls: Vec<usize>,
    fail_fetch_call: Option<usize>,
    languages: Option<Vec<SandboxLanguage>>,
    submitted: Mutex<Vec<ExecutionRequest>>,
    fetches: Mutex<usize>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<SubmissionStatus>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Every fetch returns the same status
    pub fn repeating(status: SubmissionStatus) -> Self {
        Self {
            repeat: Some(status),
            ..Default::default()
        }
    }

    /// Every submit fails
    pub fn failing_submit() -> Self {
        Self {
            fail_all_submits: true,
            ..Default::default()
        }
    }

    /// Fail the given submit calls (1-based)
    pub fn fail_submit_on(mut self, calls: &[usize]) -> Self {
        self.fail_submit_calls = calls.to_vec();
        self
    }

    /// Fail the given fetch call (1-based)
    pub fn fail_fetch_at(mut self, call: usize) -> Self {
        self.fail_fetch_call = Some(call);
        self
    }

    pub fn with_languages(mut self, languages: Vec<SandboxLanguage>) -> Self {
        self.languages = Some(languages);
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn fetch_calls(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    pub fn submitted(&self) -> Vec<ExecutionRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SandboxTransport for ScriptedTransport {
    async fn submit(&self, request: &ExecutionRequest) -> Result<ExecutionToken, TransportError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        let call = submitted.len();

        if self.fail_all_submits || self.fail_submit_calls.contains(&call) {
            return Err(unavailable(Stage::Submit));
        }
        Ok(ExecutionToken::new(format!("token-{}", call)))
    }

    async fn fetch(&self, _token: &ExecutionToken) -> Result<SubmissionStatus, TransportError> {
        let call = {
            let mut fetches = self.fetches.lock().unwrap();
            *fetches += 1;
            *fetches
        };

        if self.fail_fetch_call == Some(call) {
            return Err(unavailable(Stage::Poll));
        }
        if let Some(status) = &self.repeat {
            return Ok(status.clone());
        }
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.expect("poll script exhausted"))
    }

    async fn languages(&self) -> Result<Vec<SandboxLanguage>, TransportError> {
        self.languages
            .clone()
            .ok_or_else(|| unavailable(Stage::Languages))
    }
}

/// Records requested sleeps instead of sleeping
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
