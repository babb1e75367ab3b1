/// Batch Test Runner
///
/// Runs one submission against an ordered list of test cases, one case at
/// a time. Cases are never run concurrently: the sandbox is shared and
/// rate limited, and sequential runs keep the worst case at
/// N × poll budget.
///
/// A transport failure on one case marks that case failed with the error
/// as its diagnostic; the remaining cases still run.
use crate::engine::ExecutionClient;
use crate::evaluator;
use judgeway_common::types::{BatchReport, ExecutionRequest, TestCase};
use tracing::{debug, info, instrument, warn};

#[derive(Clone)]
pub struct BatchRunner {
    client: ExecutionClient,
}

impl BatchRunner {
    pub fn new(client: ExecutionClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ExecutionClient {
        &self.client
    }

    /// Run every test case with default resource limits
    pub async fn run_all(
        &self,
        source_code: &str,
        language_id: u32,
        test_cases: &[TestCase],
    ) -> BatchReport {
        let template = ExecutionRequest::new(source_code, language_id);
        self.run_with(&template, test_cases).await
    }

    /// Run every test case, using `template` for source, language and
    /// limits and each case's input as stdin
    #[instrument(
        skip(self, template, test_cases),
        fields(language_id = template.language_id, test_cases = test_cases.len())
    )]
    pub async fn run_with(&self, template: &ExecutionRequest, test_cases: &[TestCase]) -> BatchReport {
        let mut report = BatchReport::with_capacity(test_cases.len());

        for (idx, test_case) in test_cases.iter().enumerate() {
            let request = ExecutionRequest {
                stdin: Some(test_case.input.clone()),
                ..template.clone()
            };

            let case_report = match self.client.execute(&request).await {
                Ok(result) => {
                    let case_report = evaluator::evaluate_case(test_case, &result);
                    debug!(
                        test_num = idx + 1,
                        outcome = %result.outcome,
                        passed = case_report.passed,
                        "Test case evaluated"
                    );
                    case_report
                }
                Err(e) => {
                    warn!(test_num = idx + 1, error = %e, "Test case execution failed");
                    evaluator::transport_failure(test_case, &e)
                }
            };

            report.push(case_report);
        }

        info!(
            passed = report.passed_count(),
            total = report.total(),
            "Batch complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PollPolicy;
    use crate::testing::{accepted, status, RecordingSleeper, ScriptedTransport};
    use std::sync::Arc;

    fn runner(transport: Arc<ScriptedTransport>) -> BatchRunner {
        BatchRunner::new(ExecutionClient::with_sleeper(
            transport,
            Arc::new(RecordingSleeper::default()),
            PollPolicy::default(),
        ))
    }

    fn cases() -> Vec<TestCase> {
        vec![
            TestCase::new("1 2", "3"),
            TestCase::new("2 2", "4"),
            TestCase::new("5 5", "10"),
        ]
    }

    #[tokio::test]
    async fn test_all_pass_in_order() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            accepted("3\n"),
            status(2),
            accepted("4\n"),
            accepted("10"),
        ]));

        let report = runner(transport.clone()).run_all("solve()", 71, &cases()).await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed_count(), 3);
        assert!(report.all_passed());

        let inputs: Vec<Option<String>> =
            transport.submitted().into_iter().map(|r| r.stdin).collect();
        assert_eq!(
            inputs,
            vec![
                Some("1 2".to_string()),
                Some("2 2".to_string()),
                Some("5 5".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_failure_does_not_abort_batch() {
        // Case 2's submit fails, so only cases 1 and 3 ever poll
        let transport = Arc::new(
            ScriptedTransport::new(vec![accepted("3"), accepted("10")]).fail_submit_on(&[2]),
        );

        let report = runner(transport.clone()).run_all("solve()", 71, &cases()).await;

        assert_eq!(report.total(), 3);
        let cases = report.cases();
        assert!(cases[0].passed);
        assert!(!cases[1].passed);
        assert!(cases[1].actual_output.is_none());
        assert!(cases[1].diagnostic.as_deref().unwrap().contains("submit"));
        assert!(cases[2].passed);
        assert_eq!(cases[1].test_case, TestCase::new("2 2", "4"));

        assert_eq!(transport.submit_calls(), 3);
        assert_eq!(transport.fetch_calls(), 2);
        assert_eq!(report.first_failure().map(|(idx, _)| idx), Some(1));
    }

    #[tokio::test]
    async fn test_mixed_outcomes() {
        let mut runtime_error = status(11);
        runtime_error.stdout = Some("10".to_string());
        runtime_error.stderr = Some("Traceback".to_string());

        let transport = Arc::new(ScriptedTransport::new(vec![
            accepted("3"),
            accepted("5"),
            runtime_error,
        ]));

        let report = runner(transport).run_all("solve()", 71, &cases()).await;

        let passed: Vec<bool> = report.cases().iter().map(|c| c.passed).collect();
        assert_eq!(passed, vec![true, false, false]);
        assert_eq!(report.cases()[1].actual_output.as_deref(), Some("5"));
        assert_eq!(report.cases()[2].diagnostic.as_deref(), Some("Traceback"));
        assert_eq!(report.passed_count(), 1);
    }

    #[tokio::test]
    async fn test_unterminated_case_fails() {
        let transport = Arc::new(ScriptedTransport::repeating(status(1)));

        let report = runner(transport.clone())
            .run_all("solve()", 71, &[TestCase::new("", "")])
            .await;

        assert_eq!(report.total(), 1);
        assert!(!report.cases()[0].passed);
        assert_eq!(transport.fetch_calls(), 30);
    }

    #[tokio::test]
    async fn test_every_case_fails_when_sandbox_is_down() {
        let transport = Arc::new(ScriptedTransport::failing_submit());

        let report = runner(transport.clone()).run_all("solve()", 71, &cases()).await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.passed_count(), 0);
        assert!(report.cases().iter().all(|c| c.diagnostic.is_some()));
        assert_eq!(transport.submit_calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let report = runner(transport.clone()).run_all("solve()", 71, &[]).await;
        assert_eq!(report.total(), 0);
        assert_eq!(transport.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_template_limits_are_forwarded() {
        let transport = Arc::new(ScriptedTransport::new(vec![accepted("3")]));
        let template = ExecutionRequest::new("solve()", 54).with_limits(5.0, 256_000);

        runner(transport.clone())
            .run_with(&template, &[TestCase::new("1 2", "3")])
            .await;

        let sent = &transport.submitted()[0];
        assert_eq!(sent.language_id, 54);
        assert_eq!(sent.cpu_time_limit_seconds, 5.0);
        assert_eq!(sent.memory_limit_kb, 256_000);
        assert_eq!(sent.stdin.as_deref(), Some("1 2"));
    }
}
