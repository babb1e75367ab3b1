// CLI commands for talking to the execution sandbox
use anyhow::{bail, Context, Result};
use judgeway_common::config::SandboxConfig;
use judgeway_common::languages::{self, LanguageDescriptor};
use judgeway_common::types::{BatchReport, ExecutionRequest, ExecutionResult, TestCase};
use judgeway_sandbox::{BatchRunner, ExecutionClient};
use std::fs;
use std::path::Path;

fn client_from_env() -> Result<ExecutionClient> {
    let config = SandboxConfig::from_env().context("Invalid sandbox configuration")?;
    ExecutionClient::from_config(&config).context("Failed to build sandbox client")
}

fn read_source(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file {}", path.display()))?;
    if source.trim().is_empty() {
        bail!("Source file {} is empty", path.display());
    }
    Ok(source)
}

/// Accept a numeric language id as-is, otherwise look the name up in the registry
pub fn resolve_language(value: &str) -> Result<u32> {
    if let Ok(id) = value.trim().parse::<u32>() {
        return Ok(id);
    }
    match languages::find_by_name(value.trim()) {
        Some(language) => Ok(language.id),
        None => bail!("Unknown language {:?}", value),
    }
}

/// Parse a JSON array of test cases
pub fn parse_test_cases(content: &str) -> Result<Vec<TestCase>> {
    serde_json::from_str(content).context("Failed to parse test cases JSON")
}

/// List languages, optionally filtered by what the sandbox offers
pub async fn list_languages(remote: bool) -> Result<()> {
    let languages: Vec<&LanguageDescriptor> = if remote {
        client_from_env()?.available_languages().await
    } else {
        languages::list_all().iter().collect()
    };

    for language in languages {
        println!("{:>4}  {}", language.id, language.display_name);
    }
    Ok(())
}

pub fn print_boilerplate(language_id: u32) -> Result<()> {
    let Some(language) = languages::describe(language_id) else {
        bail!("Unknown language ID {}", language_id);
    };
    println!("{}", language.boilerplate);
    Ok(())
}

/// Execute a source file once and print the result
pub async fn run_file(
    language_id: u32,
    file: &Path,
    stdin: Option<&Path>,
    time_limit: f64,
    memory_limit: u64,
) -> Result<()> {
    let source = read_source(file)?;
    let mut request =
        ExecutionRequest::new(source, language_id).with_limits(time_limit, memory_limit);
    if let Some(path) = stdin {
        let input = fs::read_to_string(path)
            .with_context(|| format!("Failed to read stdin file {}", path.display()))?;
        request = request.with_stdin(input);
    }
    request.validate()?;

    println!("→ Running {} ({})", file.display(), languages::display_name(language_id));

    let result = client_from_env()?
        .execute(&request)
        .await
        .context("Sandbox request failed")?;

    print!("{}", format_result(&result));
    Ok(())
}

/// Run every case and print a per-case table; returns whether all passed
pub async fn test_file(language_id: u32, file: &Path, cases_path: &Path) -> Result<bool> {
    let source = read_source(file)?;
    let content = fs::read_to_string(cases_path)
        .with_context(|| format!("Failed to read test cases {}", cases_path.display()))?;
    let test_cases = parse_test_cases(&content)?;

    println!(
        "→ Testing {} against {} case(s) ({})",
        file.display(),
        test_cases.len(),
        languages::display_name(language_id)
    );

    let runner = BatchRunner::new(client_from_env()?);
    let report = runner.run_all(&source, language_id, &test_cases).await;

    print!("{}", format_report(&report));
    Ok(report.all_passed())
}

pub fn format_result(result: &ExecutionResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Status: {}\n", result.outcome));
    if !result.is_terminal() {
        out.push_str("  ⚠ Sandbox did not finish before the poll budget ran out\n");
    }
    if let Some(time) = result.elapsed_seconds {
        out.push_str(&format!("  Time:   {:.3}s\n", time));
    }
    if let Some(memory) = result.memory_kb {
        out.push_str(&format!("  Memory: {} KB\n", memory));
    }
    if let Some(stdout) = result.stdout.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("\n--- stdout ---\n{}\n", stdout.trim_end()));
    }
    if let Some(diagnostic) = result.diagnostic() {
        out.push_str(&format!("\n--- diagnostics ---\n{}\n", diagnostic.trim_end()));
    }
    out
}

pub fn format_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for (idx, case) in report.cases().iter().enumerate() {
        let mark = if case.passed { "✓" } else { "✗" };
        out.push_str(&format!("  {} Test {}", mark, idx + 1));
        if let Some(time) = case.elapsed_seconds {
            out.push_str(&format!(" ({:.3}s)", time));
        }
        out.push('\n');

        if !case.passed {
            out.push_str(&format!(
                "    Expected: \"{}\"\n",
                case.test_case.expected_output.trim()
            ));
            match &case.actual_output {
                Some(actual) => out.push_str(&format!("    Got:      \"{}\"\n", actual)),
                None => out.push_str("    Got:      <no result>\n"),
            }
            if let Some(diagnostic) = &case.diagnostic {
                let first_line = diagnostic.lines().next().unwrap_or("");
                out.push_str(&format!("    Error:    {}\n", first_line));
            }
        }
    }
    out.push_str(&format!(
        "\n  Passed {} / {}\n",
        report.passed_count(),
        report.total()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use judgeway_common::status::ExecutionOutcome;
    use judgeway_common::types::{ExecutionToken, TestCaseReport};

    #[test]
    fn test_parse_test_cases() {
        let cases = parse_test_cases(
            r#"[{"input": "1 2", "expected_output": "3"}, {"input": "", "expected_output": "ok"}]"#,
        )
        .unwrap();
        assert_eq!(cases, vec![TestCase::new("1 2", "3"), TestCase::new("", "ok")]);

        assert!(parse_test_cases(r#"{"input": "1"}"#).is_err());
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language("71").unwrap(), 71);
        // Ids outside the registry are still forwarded to the sandbox
        assert_eq!(resolve_language("9999").unwrap(), 9999);
        assert_eq!(resolve_language("python").unwrap(), 71);
        assert_eq!(resolve_language("Rust").unwrap(), 73);
        assert!(resolve_language("cobol").is_err());
    }

    #[test]
    fn test_format_result() {
        let result = ExecutionResult {
            outcome: ExecutionOutcome::CompilationError,
            stdout: None,
            stderr: None,
            compile_output: Some("main.cpp:3: error\n".to_string()),
            message: None,
            elapsed_seconds: None,
            memory_kb: Some(512),
            token: ExecutionToken::new("t"),
        };

        let text = format_result(&result);
        assert!(text.contains("Status: Compilation Error"));
        assert!(text.contains("Memory: 512 KB"));
        assert!(text.contains("main.cpp:3: error"));
        assert!(!text.contains("stdout"));
    }

    #[test]
    fn test_format_result_flags_unfinished() {
        let result = ExecutionResult {
            outcome: ExecutionOutcome::Processing,
            stdout: None,
            stderr: None,
            compile_output: None,
            message: None,
            elapsed_seconds: None,
            memory_kb: None,
            token: ExecutionToken::new("t"),
        };
        assert!(format_result(&result).contains("poll budget"));
    }

    #[test]
    fn test_format_report() {
        let report: BatchReport = vec![
            TestCaseReport {
                test_case: TestCase::new("1", "1"),
                actual_output: Some("1".to_string()),
                passed: true,
                diagnostic: None,
                elapsed_seconds: Some(0.01),
                memory_kb: None,
            },
            TestCaseReport {
                test_case: TestCase::new("2", "4"),
                actual_output: None,
                passed: false,
                diagnostic: Some("sandbox submit request failed\nmore".to_string()),
                elapsed_seconds: None,
                memory_kb: None,
            },
        ]
        .into_iter()
        .collect();

        let text = format_report(&report);
        assert!(text.contains("✓ Test 1 (0.010s)"));
        assert!(text.contains("✗ Test 2"));
        assert!(text.contains("<no result>"));
        assert!(text.contains("Error:    sandbox submit request failed\n"));
        assert!(text.contains("Passed 1 / 2"));
    }
}
