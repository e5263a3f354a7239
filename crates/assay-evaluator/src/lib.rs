//! Assay Evaluator Adapter
//!
//! Implementations of the `Evaluator` trait from `assay-domain`.
//!
//! # Architecture
//!
//! The oracle is unreliable by contract. Transport failures are errors;
//! malformed response *content* degrades to defaults in [`parse_evaluation`].
//!
//! # Evaluators
//!
//! - `MockEvaluator`: Deterministic canned responses for testing
//! - `OllamaEvaluator`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use assay_evaluator::MockEvaluator;
//! use assay_domain::traits::Evaluator;
//! use assay_domain::RawDimension;
//!
//! let evaluator = MockEvaluator::new(r#"{"novelty": 2000}"#);
//! let output = evaluator.evaluate("some text", None).unwrap();
//! assert_eq!(output.novelty, RawDimension::Number(2000.0));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ollama;
pub mod parser;
pub mod prompt;

use assay_domain::traits::Evaluator;
use assay_domain::EvaluatorOutput;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use config::EvaluatorConfig;
pub use ollama::OllamaEvaluator;
pub use parser::parse_evaluation;
pub use prompt::build_prompt;

/// Errors that can occur while calling the oracle
#[derive(Error, Debug)]
pub enum EvaluatorError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Transport-level response could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Evaluator error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum CannedReply {
    Response(String),
    Error,
}

/// Mock evaluator returning canned oracle text
///
/// Responses are raw oracle text and go through the same lenient parser
/// as the HTTP evaluator, so malformed replies can be tested too.
///
/// # Examples
///
/// ```
/// use assay_evaluator::MockEvaluator;
/// use assay_domain::traits::Evaluator;
///
/// let mut evaluator = MockEvaluator::default();
/// evaluator.add_response("first", r#"{"novelty": 100}"#);
/// evaluator.add_error("broken");
/// assert!(evaluator.evaluate("first", None).is_ok());
/// assert!(evaluator.evaluate("broken", None).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockEvaluator {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, CannedReply>>>,
    call_count: Arc<Mutex<usize>>,
}

fn relock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockEvaluator {
    /// Create a new MockEvaluator with a fixed response for all submissions
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given submission text
    pub fn add_response(&mut self, text: impl Into<String>, response: impl Into<String>) {
        relock(&self.responses).insert(text.into(), CannedReply::Response(response.into()));
    }

    /// Configure a transport error for a specific submission text
    pub fn add_error(&mut self, text: impl Into<String>) {
        relock(&self.responses).insert(text.into(), CannedReply::Error);
    }

    /// Get the number of times evaluate was called
    pub fn call_count(&self) -> usize {
        *relock(&self.call_count)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *relock(&self.call_count) = 0;
    }
}

impl Default for MockEvaluator {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl Evaluator for MockEvaluator {
    type Error = EvaluatorError;

    fn evaluate(&self, text: &str, _category_hint: Option<&str>) -> Result<EvaluatorOutput, Self::Error> {
        *relock(&self.call_count) += 1;

        let reply = relock(&self.responses).get(text).cloned();
        match reply {
            Some(CannedReply::Error) => Err(EvaluatorError::Other("Mock error".to_string())),
            Some(CannedReply::Response(response)) => Ok(parse_evaluation(&response)),
            None => Ok(parse_evaluation(&self.default_response)),
        }
    }
}
