//! Ollama Evaluator Implementation
//!
//! Sends submissions to a local Ollama model acting as the evaluation oracle.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//! - Lenient reply parsing (malformed content degrades, never errors)
//!
//! # Examples
//!
//! ```no_run
//! use assay_evaluator::OllamaEvaluator;
//!
//! let evaluator = OllamaEvaluator::new("http://localhost:11434", "llama3");
//!
//! // `evaluate` is async; the `Evaluator` trait provides a blocking wrapper
//! // for callers outside a runtime or on a multi-threaded one.
//! ```

use crate::{build_prompt, parse_evaluation, EvaluatorConfig, EvaluatorError};
use assay_domain::traits::Evaluator;
use assay_domain::EvaluatorOutput;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for oracle requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Ollama-backed evaluation oracle
pub struct OllamaEvaluator {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

impl OllamaEvaluator {
    /// Create a new Ollama evaluator
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            client: build_client(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create an evaluator from configuration
    pub fn from_config(config: &EvaluatorConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            client: build_client(config.timeout_secs),
            max_retries: config.max_retries,
        }
    }

    /// Create an evaluator against the default local endpoint
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Send a raw prompt and return the model's reply text
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Every attempt fails
    pub async fn generate(&self, prompt: &str) -> Result<String, EvaluatorError> {
        let url = format!("{}/api/generate", self.endpoint.trim_end_matches('/'));

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<OllamaGenerateResponse>()
                            .await
                            .map(|r| r.response)
                            .map_err(|e| {
                                EvaluatorError::InvalidResponse(format!(
                                    "Failed to decode response envelope: {}",
                                    e
                                ))
                            });
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(EvaluatorError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(EvaluatorError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(EvaluatorError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(EvaluatorError::Communication(format!(
                        "Request failed: {}",
                        e
                    )));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                debug!(attempt = attempts, delay_secs = delay.as_secs(), "Retrying oracle request");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| EvaluatorError::Communication("Max retries exceeded".to_string())))
    }

    /// Evaluate a submission's text
    pub async fn evaluate(
        &self,
        text: &str,
        category_hint: Option<&str>,
    ) -> Result<EvaluatorOutput, EvaluatorError> {
        let prompt = build_prompt(text, category_hint);
        let reply = self.generate(&prompt).await?;
        Ok(parse_evaluation(&reply))
    }
}

impl Evaluator for OllamaEvaluator {
    type Error = EvaluatorError;

    /// Blocking evaluation
    ///
    /// Inside a multi-threaded tokio runtime this parks the current worker with
    /// `block_in_place`; outside any runtime it starts a private one. A
    /// current-thread runtime cannot be blocked, so that case is an error; use
    /// the async inherent `evaluate` there instead.
    fn evaluate(&self, text: &str, category_hint: Option<&str>) -> Result<EvaluatorOutput, Self::Error> {
        let request = OllamaEvaluator::evaluate(self, text, category_hint);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(request))
            }
            Ok(_) => Err(EvaluatorError::Other(
                "Blocking evaluate called from a current-thread runtime; use the async evaluate".into(),
            )),
            Err(_) => tokio::runtime::Runtime::new()
                .map_err(|e| EvaluatorError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(request),
        }
    }
}
