// HTTP route handlers for the Judgeway API

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use judgeway_common::languages;
use judgeway_common::recorder::{SubmissionContext, SubmissionId};
use judgeway_common::types::{
    ExecutionRequest, ExecutionResult, TestCase, TestCaseReport, DEFAULT_CPU_TIME_LIMIT_SECONDS,
    DEFAULT_MEMORY_LIMIT_KB,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::metrics;
use crate::AppState;

const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Deserialize)]
pub struct ExecuteCodeRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "languageId")]
    pub language_id: Option<u32>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default, alias = "questionId")]
    pub question_id: Option<String>,
    #[serde(default, alias = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default = "default_time_limit", alias = "timeLimit")]
    pub time_limit: f64,
    #[serde(default = "default_memory_limit", alias = "memoryLimit")]
    pub memory_limit: u64,
}

#[derive(Debug, Deserialize)]
pub struct RunTestsRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "languageId")]
    pub language_id: Option<u32>,
    #[serde(default, alias = "testCases")]
    pub test_cases: Vec<TestCase>,
    #[serde(default = "default_time_limit", alias = "timeLimit")]
    pub time_limit: f64,
    #[serde(default = "default_memory_limit", alias = "memoryLimit")]
    pub memory_limit: u64,
}

fn default_time_limit() -> f64 {
    DEFAULT_CPU_TIME_LIMIT_SECONDS
}

fn default_memory_limit() -> u64 {
    DEFAULT_MEMORY_LIMIT_KB
}

#[derive(Debug, Serialize)]
pub struct ExecuteCodeResponse {
    pub submission_id: Option<SubmissionId>,
    pub result: ExecutionResult,
}

#[derive(Debug, Serialize)]
pub struct RunTestsResponse {
    pub passed: usize,
    pub total: usize,
    pub cases: Vec<TestCaseReport>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

/// Build and validate an execution request from the raw body fields
fn build_request(
    code: Option<String>,
    language_id: Option<u32>,
    time_limit: f64,
    memory_limit: u64,
) -> Result<ExecutionRequest, Response> {
    // Empty code and language 0 count as missing
    let code = code.filter(|code| !code.is_empty());
    let language_id = language_id.filter(|id| *id != 0);
    let (Some(code), Some(language_id)) = (code, language_id) else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Code and language ID are required",
        ));
    };

    let request = ExecutionRequest::new(code, language_id).with_limits(time_limit, memory_limit);
    if let Err(e) = request.validate() {
        return Err(error_response(StatusCode::BAD_REQUEST, e.to_string()));
    }
    Ok(request)
}

/// GET /status - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus exposition
pub async fn metrics() -> impl IntoResponse {
    (StatusCode::OK, metrics::render())
}

/// GET /languages - Registry languages the sandbox currently offers
pub async fn list_languages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let languages = state.client().available_languages().await;
    Json(serde_json::json!({ "languages": languages }))
}

/// GET /languages/:id - One language with its boilerplate
pub async fn get_language(Path(language_id): Path<u32>) -> Response {
    match languages::describe(language_id) {
        Some(language) => (StatusCode::OK, Json(language)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Unknown language ID {}", language_id),
        ),
    }
}

/// POST /execute - Run code once and record the submission
pub async fn execute_code(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ExecuteCodeRequest>,
) -> Response {
    let mut request = match build_request(
        payload.code,
        payload.language_id,
        payload.time_limit,
        payload.memory_limit,
    ) {
        Ok(request) => request,
        Err(response) => return response,
    };
    request.stdin = payload.input;

    let context = SubmissionContext {
        user_id: headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        question_id: payload.question_id,
        session_id: payload.session_id,
    };

    let timer = metrics::EXECUTE_DURATION_SECONDS.start_timer();
    let result = state.client().execute(&request).await;
    timer.observe_duration();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            metrics::TRANSPORT_ERRORS_TOTAL.inc();
            error!(language_id = request.language_id, error = %e, "Code execution error");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to execute code");
        }
    };

    metrics::EXECUTIONS_TOTAL
        .with_label_values(&[result.outcome.metric_label()])
        .inc();

    // Recording is best-effort; the caller still gets the result
    let submission_id = match state.recorder.record(&context, &request, &result).await {
        Ok(id) => Some(id),
        Err(e) => {
            error!(token = %result.token, error = %e, "Failed to record submission");
            None
        }
    };

    info!(
        token = %result.token,
        outcome = %result.outcome,
        submission_id = ?submission_id,
        "Code executed"
    );

    (
        StatusCode::OK,
        Json(ExecuteCodeResponse {
            submission_id,
            result,
        }),
    )
        .into_response()
}

/// POST /run-tests - Validate code against a list of test cases
pub async fn run_tests(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RunTestsRequest>,
) -> Response {
    let template = match build_request(
        payload.code,
        payload.language_id,
        payload.time_limit,
        payload.memory_limit,
    ) {
        Ok(request) => request,
        Err(response) => return response,
    };

    if payload.test_cases.is_empty() {
        warn!(language_id = template.language_id, "Test run requested with no test cases");
    }

    let report = state.runner.run_with(&template, &payload.test_cases).await;

    for case in report.cases() {
        let label = if case.passed { "true" } else { "false" };
        metrics::BATCH_CASES_TOTAL.with_label_values(&[label]).inc();
    }

    let response = RunTestsResponse {
        passed: report.passed_count(),
        total: report.total(),
        cases: report.into_cases(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /submissions/:id - Fetch a recorded submission
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<String>,
) -> Response {
    let id = match Uuid::parse_str(&submission_id) {
        Ok(id) => id,
        Err(_) => {
            return error_response(StatusCode::BAD_REQUEST, "Invalid submission ID format");
        }
    };

    match state.recorder.fetch(&id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Submission not found"),
        Err(e) => {
            error!(submission_id = %id, error = %e, "Failed to fetch submission");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query submission: {}", e),
            )
        }
    }
}

/// GET /users/:id/submissions - Submission ids recorded for a user
pub async fn list_user_submissions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    match state.recorder.list_for_user(&user_id).await {
        Ok(submissions) => (
            StatusCode::OK,
            Json(serde_json::json!({ "user_id": user_id, "submissions": submissions })),
        )
            .into_response(),
        Err(e) => {
            error!(user_id = %user_id, error = %e, "Failed to list submissions");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query submissions: {}", e),
            )
        }
    }
}
