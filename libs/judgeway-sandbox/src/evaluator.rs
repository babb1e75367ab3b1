/// Test Evaluator - Output Comparison
///
/// **Core Responsibility:**
/// Turn one execution result (or one transport failure) into a
/// `TestCaseReport` for a test case.
///
/// **Critical Properties:**
/// - Knows nothing about HTTP or polling
/// - Knows nothing about language runtimes
/// - Pure function: (test case, execution result) → report
///
/// **Pass Rule:**
/// A case passes only if the outcome is exactly `Accepted` AND the trimmed
/// stdout equals the trimmed expected output. Correct output from a run
/// that ended in a runtime error still fails.
///
/// **Normalization Rules:**
/// - Trim leading and trailing whitespace: YES
/// - Internal whitespace: preserved
/// - Case sensitivity: YES (exact match required)
use crate::error::TransportError;
use judgeway_common::status::ExecutionOutcome;
use judgeway_common::types::{ExecutionResult, TestCase, TestCaseReport};

fn normalize_output(output: &str) -> &str {
    output.trim()
}

/// Evaluate a finished execution against its test case
pub fn evaluate_case(test_case: &TestCase, result: &ExecutionResult) -> TestCaseReport {
    let actual = normalize_output(result.stdout.as_deref().unwrap_or(""));
    let expected = normalize_output(&test_case.expected_output);

    let passed = result.outcome == ExecutionOutcome::Accepted && actual == expected;

    TestCaseReport {
        test_case: test_case.clone(),
        actual_output: Some(actual.to_string()),
        passed,
        diagnostic: result.diagnostic().map(str::to_string),
        elapsed_seconds: result.elapsed_seconds,
        memory_kb: result.memory_kb,
    }
}

/// Report for a case whose execution never produced a result
pub fn transport_failure(test_case: &TestCase, error: &TransportError) -> TestCaseReport {
    TestCaseReport {
        test_case: test_case.clone(),
        actual_output: None,
        passed: false,
        diagnostic: Some(error.to_string()),
        elapsed_seconds: None,
        memory_kb: None,
    }
}
