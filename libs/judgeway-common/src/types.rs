use crate::status::ExecutionOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CPU_TIME_LIMIT_SECONDS: f64 = 2.0;
pub const DEFAULT_MEMORY_LIMIT_KB: u64 = 128_000;

fn default_cpu_time_limit() -> f64 {
    DEFAULT_CPU_TIME_LIMIT_SECONDS
}

fn default_memory_limit() -> u64 {
    DEFAULT_MEMORY_LIMIT_KB
}

/// One source + input pair to run in the sandbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub source_code: String,
    pub language_id: u32,
    #[serde(default)]
    pub stdin: Option<String>,
    #[serde(default = "default_cpu_time_limit")]
    pub cpu_time_limit_seconds: f64,
    #[serde(default = "default_memory_limit")]
    pub memory_limit_kb: u64,
}

impl ExecutionRequest {
    pub fn new(source_code: impl Into<String>, language_id: u32) -> Self {
        Self {
            source_code: source_code.into(),
            language_id,
            stdin: None,
            cpu_time_limit_seconds: DEFAULT_CPU_TIME_LIMIT_SECONDS,
            memory_limit_kb: DEFAULT_MEMORY_LIMIT_KB,
        }
    }

    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    pub fn with_limits(mut self, cpu_time_limit_seconds: f64, memory_limit_kb: u64) -> Self {
        self.cpu_time_limit_seconds = cpu_time_limit_seconds;
        self.memory_limit_kb = memory_limit_kb;
        self
    }

    /// Checks the constraints the sandbox cannot be trusted to report well.
    /// Unknown language ids are deliberately not rejected here.
    pub fn validate(&self) -> Result<(), InvalidRequest> {
        if self.source_code.is_empty() {
            return Err(InvalidRequest::EmptySource);
        }
        if !(self.cpu_time_limit_seconds > 0.0) {
            return Err(InvalidRequest::NonPositiveTimeLimit);
        }
        if self.memory_limit_kb == 0 {
            return Err(InvalidRequest::ZeroMemoryLimit);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("source code must not be empty")]
    EmptySource,
    #[error("cpu time limit must be positive")]
    NonPositiveTimeLimit,
    #[error("memory limit must be positive")]
    ZeroMemoryLimit,
}

/// Opaque handle the sandbox hands out for one in-flight job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionToken(String);

impl ExecutionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized result of one execution
///
/// `outcome` is `Queued`/`Processing` only when polling ran out of
/// attempts; callers should read that as "timed out, status unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub outcome: ExecutionOutcome,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub message: Option<String>,
    pub elapsed_seconds: Option<f64>,
    pub memory_kb: Option<u64>,
    pub token: ExecutionToken,
}

impl ExecutionResult {
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// First non-empty diagnostic text: stderr, then compiler output,
    /// then the sandbox message
    pub fn diagnostic(&self) -> Option<&str> {
        [&self.stderr, &self.compile_output, &self.message]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseReport {
    pub test_case: TestCase,
    pub actual_output: Option<String>,
    pub passed: bool,
    pub diagnostic: Option<String>,
    pub elapsed_seconds: Option<f64>,
    pub memory_kb: Option<u64>,
}

/// Per-case reports in the same order as the submitted test cases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchReport {
    cases: Vec<TestCaseReport>,
}

impl BatchReport {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cases: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, report: TestCaseReport) {
        self.cases.push(report);
    }

    pub fn cases(&self) -> &[TestCaseReport] {
        &self.cases
    }

    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn passed_count(&self) -> usize {
        self.cases.iter().filter(|case| case.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|case| case.passed)
    }

    /// Index and report of the first failing case, in submission order
    pub fn first_failure(&self) -> Option<(usize, &TestCaseReport)> {
        self.cases.iter().enumerate().find(|(_, case)| !case.passed)
    }

    pub fn into_cases(self) -> Vec<TestCaseReport> {
        self.cases
    }
}

impl FromIterator<TestCaseReport> for BatchReport {
    fn from_iter<I: IntoIterator<Item = TestCaseReport>>(iter: I) -> Self {
        Self {
            cases: iter.into_iter().collect(),
        }
    }
}
