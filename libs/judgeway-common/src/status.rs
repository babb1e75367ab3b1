/// Sandbox status codes and their semantic outcomes
///
/// The sandbox reports progress and verdicts as small integers (1-14).
/// Everything above the wire works with `ExecutionOutcome` instead, so a
/// new status code shows up as a non-exhaustive match rather than a
/// silently mis-handled number.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime error flavours reported by the sandbox (codes 7-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeErrorKind {
    Sigsegv,
    Sigxfsz,
    Sigfpe,
    Sigabrt,
    Nzec,
    Other,
}

impl RuntimeErrorKind {
    fn signal_label(&self) -> &'static str {
        match self {
            RuntimeErrorKind::Sigsegv => "SIGSEGV",
            RuntimeErrorKind::Sigxfsz => "SIGXFSZ",
            RuntimeErrorKind::Sigfpe => "SIGFPE",
            RuntimeErrorKind::Sigabrt => "SIGABRT",
            RuntimeErrorKind::Nzec => "NZEC",
            RuntimeErrorKind::Other => "Other",
        }
    }
}

/// Closed set of execution outcomes
///
/// Serialized in the sandbox's own shape, `{ "id": 7, "description":
/// "Runtime Error (SIGSEGV)" }`, so stored records and API responses stay
/// readable by clients that already speak the sandbox format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "OutcomeRepr", from = "OutcomeRepr")]
pub enum ExecutionOutcome {
    Queued,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    RuntimeError(RuntimeErrorKind),
    InternalError,
    ExecFormatError,
    Unknown(i64),
}

impl ExecutionOutcome {
    /// Map a raw sandbox status code. Never fails: codes outside the
    /// table become `Unknown(code)`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ExecutionOutcome::Queued,
            2 => ExecutionOutcome::Processing,
            3 => ExecutionOutcome::Accepted,
            4 => ExecutionOutcome::WrongAnswer,
            5 => ExecutionOutcome::TimeLimitExceeded,
            6 => ExecutionOutcome::CompilationError,
            7 => ExecutionOutcome::RuntimeError(RuntimeErrorKind::Sigsegv),
            8 => ExecutionOutcome::RuntimeError(RuntimeErrorKind::Sigxfsz),
            9 => ExecutionOutcome::RuntimeError(RuntimeErrorKind::Sigfpe),
            10 => ExecutionOutcome::RuntimeError(RuntimeErrorKind::Sigabrt),
            11 => ExecutionOutcome::RuntimeError(RuntimeErrorKind::Nzec),
            12 => ExecutionOutcome::RuntimeError(RuntimeErrorKind::Other),
            13 => ExecutionOutcome::InternalError,
            14 => ExecutionOutcome::ExecFormatError,
            other => ExecutionOutcome::Unknown(other),
        }
    }

    /// The sandbox status code this outcome corresponds to
    pub fn code(&self) -> i64 {
        match self {
            ExecutionOutcome::Queued => 1,
            ExecutionOutcome::Processing => 2,
            ExecutionOutcome::Accepted => 3,
            ExecutionOutcome::WrongAnswer => 4,
            ExecutionOutcome::TimeLimitExceeded => 5,
            ExecutionOutcome::CompilationError => 6,
            ExecutionOutcome::RuntimeError(kind) => match kind {
                RuntimeErrorKind::Sigsegv => 7,
                RuntimeErrorKind::Sigxfsz => 8,
                RuntimeErrorKind::Sigfpe => 9,
                RuntimeErrorKind::Sigabrt => 10,
                RuntimeErrorKind::Nzec => 11,
                RuntimeErrorKind::Other => 12,
            },
            ExecutionOutcome::InternalError => 13,
            ExecutionOutcome::ExecFormatError => 14,
            ExecutionOutcome::Unknown(code) => *code,
        }
    }

    /// Terminal means the sandbox is done with the job, successfully or not
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            ExecutionOutcome::Queued | ExecutionOutcome::Processing
        )
    }

    /// Human-readable label, matching the sandbox's status descriptions
    pub fn label(&self) -> String {
        match self {
            ExecutionOutcome::Queued => "In Queue".to_string(),
            ExecutionOutcome::Processing => "Processing".to_string(),
            ExecutionOutcome::Accepted => "Accepted".to_string(),
            ExecutionOutcome::WrongAnswer => "Wrong Answer".to_string(),
            ExecutionOutcome::TimeLimitExceeded => "Time Limit Exceeded".to_string(),
            ExecutionOutcome::CompilationError => "Compilation Error".to_string(),
            ExecutionOutcome::RuntimeError(kind) => {
                format!("Runtime Error ({})", kind.signal_label())
            }
            ExecutionOutcome::InternalError => "Internal Error".to_string(),
            ExecutionOutcome::ExecFormatError => "Exec Format Error".to_string(),
            ExecutionOutcome::Unknown(code) => format!("Unknown ({})", code),
        }
    }

    /// Short, stable name used as a metrics label
    pub fn metric_label(&self) -> &'static str {
        match self {
            ExecutionOutcome::Queued => "queued",
            ExecutionOutcome::Processing => "processing",
            ExecutionOutcome::Accepted => "accepted",
            ExecutionOutcome::WrongAnswer => "wrong_answer",
            ExecutionOutcome::TimeLimitExceeded => "time_limit_exceeded",
            ExecutionOutcome::CompilationError => "compilation_error",
            ExecutionOutcome::RuntimeError(_) => "runtime_error",
            ExecutionOutcome::InternalError => "internal_error",
            ExecutionOutcome::ExecFormatError => "exec_format_error",
            ExecutionOutcome::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutcomeRepr {
    id: i64,
    #[serde(default)]
    description: String,
}

impl From<ExecutionOutcome> for OutcomeRepr {
    fn from(outcome: ExecutionOutcome) -> Self {
        OutcomeRepr {
            id: outcome.code(),
            description: outcome.label(),
        }
    }
}

impl From<OutcomeRepr> for ExecutionOutcome {
    fn from(repr: OutcomeRepr) -> Self {
        ExecutionOutcome::from_code(repr.id)
    }
}
