/// Sandbox wire format
///
/// Request and response bodies exactly as the sandbox's HTTP API expects
/// and returns them. Nothing outside this crate sees these types; the
/// normalizer turns `SubmissionStatus` into an `ExecutionResult`.
use crate::error::TransportError;
use base64::{engine::general_purpose, Engine as _};
use judgeway_common::types::ExecutionRequest;
use serde::{Deserialize, Serialize};

/// Body of `POST /submissions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub source_code: String,
    pub language_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdin: Option<String>,
    pub cpu_time_limit: f64,
    pub memory_limit: u64,
}

impl SubmissionPayload {
    /// Build the payload, base64-encoding text fields when the sandbox is
    /// configured for base64 transfer
    pub fn from_request(request: &ExecutionRequest, base64_encoded: bool) -> Self {
        let encode = |text: &str| {
            if base64_encoded {
                general_purpose::STANDARD.encode(text)
            } else {
                text.to_string()
            }
        };

        Self {
            source_code: encode(&request.source_code),
            language_id: request.language_id,
            stdin: request.stdin.as_deref().map(encode),
            cpu_time_limit: request.cpu_time_limit_seconds,
            memory_limit: request.memory_limit_kb,
        }
    }
}

/// Response of `POST /submissions` with `wait=false`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionCreated {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusField {
    pub id: i64,
    #[serde(default)]
    pub description: String,
}

/// Response of `GET /submissions/{token}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStatus {
    pub status: StatusField,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Seconds, as a decimal string ("0.002")
    #[serde(default)]
    pub time: Option<String>,
    /// Kilobytes
    #[serde(default)]
    pub memory: Option<u64>,
    #[serde(default)]
    pub token: Option<String>,
}

impl SubmissionStatus {
    /// Decode the base64-encoded text fields in place
    pub fn decode_base64(mut self) -> Result<Self, TransportError> {
        self.stdout = decode_field("stdout", self.stdout)?;
        self.stderr = decode_field("stderr", self.stderr)?;
        self.compile_output = decode_field("compile_output", self.compile_output)?;
        self.message = decode_field("message", self.message)?;
        Ok(self)
    }
}

/// One entry of `GET /languages`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SandboxLanguage {
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

fn decode_field(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, TransportError> {
    let Some(encoded) = value else {
        return Ok(None);
    };

    // The sandbox wraps encoded output at 60 columns
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| TransportError::Decode {
            field,
            reason: e.to_string(),
        })?;

    // Program output is arbitrary bytes; only the base64 framing can be malformed
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}
