/// Result Normalizer
///
/// Pure function: (raw sandbox status, token) → ExecutionResult.
/// Never fails. Unknown status codes map to `ExecutionOutcome::Unknown`,
/// an unparseable `time` becomes `None`.
use crate::wire::SubmissionStatus;
use judgeway_common::status::ExecutionOutcome;
use judgeway_common::types::{ExecutionResult, ExecutionToken};

pub fn normalize(raw: &SubmissionStatus, token: &ExecutionToken) -> ExecutionResult {
    ExecutionResult {
        outcome: ExecutionOutcome::from_code(raw.status.id),
        stdout: raw.stdout.clone(),
        stderr: raw.stderr.clone(),
        compile_output: raw.compile_output.clone(),
        message: raw.message.clone(),
        elapsed_seconds: raw.time.as_deref().and_then(parse_seconds),
        memory_kb: raw.memory,
        token: token.clone(),
    }
}

fn parse_seconds(time: &str) -> Option<f64> {
    time.trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::StatusField;
    use judgeway_common::status::RuntimeErrorKind;

    fn raw(id: i64) -> SubmissionStatus {
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

    #[test]
    fn test_accepted_fields_are_carried() {
        let mut status = raw(3);
        status.stdout = Some("4\n".to_string());
        status.time = Some("0.012".to_string());
        status.memory = Some(3264);

        let result = normalize(&status, &ExecutionToken::new("tok"));

        assert_eq!(result.outcome, ExecutionOutcome::Accepted);
        assert_eq!(result.stdout.as_deref(), Some("4\n"));
        assert_eq!(result.elapsed_seconds, Some(0.012));
        assert_eq!(result.memory_kb, Some(3264));
        assert_eq!(result.token.as_str(), "tok");
    }

    #[test]
    fn test_compilation_error_keeps_compiler_output() {
        let mut status = raw(6);
        status.compile_output = Some("main.py:1: SyntaxError".to_string());

        let result = normalize(&status, &ExecutionToken::new("tok"));

        assert_eq!(result.outcome, ExecutionOutcome::CompilationError);
        assert_eq!(result.compile_output.as_deref(), Some("main.py:1: SyntaxError"));
    }

    #[test]
    fn test_runtime_error_variants() {
        let token = ExecutionToken::new("tok");
        assert_eq!(
            normalize(&raw(7), &token).outcome,
            ExecutionOutcome::RuntimeError(RuntimeErrorKind::Sigsegv)
        );
        assert_eq!(
            normalize(&raw(11), &token).outcome,
            ExecutionOutcome::RuntimeError(RuntimeErrorKind::Nzec)
        );
    }

    #[test]
    fn test_unknown_code_does_not_fail() {
        let result = normalize(&raw(77), &ExecutionToken::new("tok"));
        assert_eq!(result.outcome, ExecutionOutcome::Unknown(77));
    }

    #[test]
    fn test_bad_time_is_dropped() {
        let mut status = raw(3);
        status.time = Some("n/a".to_string());
        assert_eq!(normalize(&status, &ExecutionToken::new("t")).elapsed_seconds, None);

        status.time = Some("-1".to_string());
        assert_eq!(normalize(&status, &ExecutionToken::new("t")).elapsed_seconds, None);
    }

    #[test]
    fn test_idempotent() {
        let mut status = raw(4);
        status.stdout = Some("5".to_string());
        let token = ExecutionToken::new("tok");
        assert_eq!(normalize(&status, &token), normalize(&status, &token));
    }
}
