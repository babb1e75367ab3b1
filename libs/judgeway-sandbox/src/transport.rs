/// Sandbox Transport - the network seam
///
/// **Responsibility:**
/// Move one request to the sandbox and bring one response back.
///
/// The transport knows URLs, headers and encodings. It does not know about
/// polling, status semantics or test cases; those live in the engine and
/// the runner, which only see the `SandboxTransport` trait.
use crate::error::{Stage, TransportError};
use crate::wire::{SandboxLanguage, SubmissionCreated, SubmissionPayload, SubmissionStatus};
use async_trait::async_trait;
use judgeway_common::config::SandboxConfig;
use judgeway_common::types::{ExecutionRequest, ExecutionToken};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response};
use tracing::debug;

#[async_trait]
pub trait SandboxTransport: Send + Sync {
    /// Create a submission without waiting for it to run
    async fn submit(&self, request: &ExecutionRequest) -> Result<ExecutionToken, TransportError>;

    /// Fetch the current state of a submission
    async fn fetch(&self, token: &ExecutionToken) -> Result<SubmissionStatus, TransportError>;

    /// Languages the sandbox currently offers
    async fn languages(&self) -> Result<Vec<SandboxLanguage>, TransportError>;
}

/// reqwest-backed transport for a Judge0-compatible HTTP API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_url: String,
    base64_encoded: bool,
}

impl HttpTransport {
    pub fn new(config: &SandboxConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .default_headers(default_headers(config))
            .timeout(config.http_timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            base64_encoded: config.base64_encoded,
        })
    }

    fn submit_endpoint(&self) -> String {
        format!(
            "{}/submissions?base64_encoded={}&wait=false",
            self.api_url, self.base64_encoded
        )
    }

    fn status_endpoint(&self, token: &ExecutionToken) -> String {
        format!(
            "{}/submissions/{}?base64_encoded={}",
            self.api_url, token, self.base64_encoded
        )
    }

    fn languages_endpoint(&self) -> String {
        format!("{}/languages", self.api_url)
    }
}

/// JSON content type always; RapidAPI credentials only when a key is set
pub(crate) fn default_headers(config: &SandboxConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(key) = &config.api_key {
        if let Ok(value) = HeaderValue::from_str(key) {
            headers.insert(HeaderName::from_static("x-rapidapi-key"), value);
        }
        if let Ok(value) = HeaderValue::from_str(&config.api_host) {
            headers.insert(HeaderName::from_static("x-rapidapi-host"), value);
        }
    }

    headers
}

/// Turn a non-2xx response into a `Status` error carrying the body
async fn check_status(stage: Stage, response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        stage,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SandboxTransport for HttpTransport {
    async fn submit(&self, request: &ExecutionRequest) -> Result<ExecutionToken, TransportError> {
        let payload = SubmissionPayload::from_request(request, self.base64_encoded);

        let response = self
            .client
            .post(self.submit_endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                stage: Stage::Submit,
                source,
            })?;

        let created: SubmissionCreated = check_status(Stage::Submit, response)
            .await?
            .json()
            .await
            .map_err(|source| TransportError::Request {
                stage: Stage::Submit,
                source,
            })?;

        debug!(token = %created.token, language_id = request.language_id, "Submission created");
        Ok(ExecutionToken::new(created.token))
    }

    async fn fetch(&self, token: &ExecutionToken) -> Result<SubmissionStatus, TransportError> {
        let response = self
            .client
            .get(self.status_endpoint(token))
            .send()
            .await
            .map_err(|source| TransportError::Request {
                stage: Stage::Poll,
                source,
            })?;

        let status: SubmissionStatus = check_status(Stage::Poll, response)
            .await?
            .json()
            .await
            .map_err(|source| TransportError::Request {
                stage: Stage::Poll,
                source,
            })?;

        if self.base64_encoded {
            status.decode_base64()
        } else {
            Ok(status)
        }
    }

    async fn languages(&self) -> Result<Vec<SandboxLanguage>, TransportError> {
        let response = self
            .client
            .get(self.languages_endpoint())
            .send()
            .await
            .map_err(|source| TransportError::Request {
                stage: Stage::Languages,
                source,
            })?;

        check_status(Stage::Languages, response)
            .await?
            .json()
            .await
            .map_err(|source| TransportError::Request {
                stage: Stage::Languages,
                source,
            })
    }
}
