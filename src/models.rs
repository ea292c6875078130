use crate::config::EvaluationConfig;
use crate::error::EvalError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Request body sent to the evaluation service. Immutable once built.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluationRequest {
    /// Parsed conversation transcript
    pub conversation: Value,
    /// Parsed retrieved-context passages
    pub context_vectors: Value,
    /// "openai" or "gemini"
    pub model_type: &'static str,
    pub model_name: String,
}

impl EvaluationRequest {
    /// Combine validated inputs with the selected provider/model.
    /// Pure and total: already-validated inputs cannot fail here.
    pub fn build(conversation: Value, context_vectors: Value, config: &EvaluationConfig) -> Self {
        Self {
            conversation,
            context_vectors,
            model_type: config.provider.model_type(),
            model_name: config.model.clone(),
        }
    }
}

/// One retrieved passage, ranked by the service. The client trusts the
/// service's ordering and does not re-sort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextItem {
    pub text: String,
    #[serde(default)]
    pub source_url: Option<String>,
    pub similarity_score: f64,
}

/// Verdict parsed from one successful evaluation response.
/// At most one report is held at a time; a new run overwrites it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationReport {
    pub relevance_score: f64,
    pub completeness_score: f64,
    pub accuracy_score: f64,
    pub generated_response: String,
    pub prompt_used: String,
    pub latency_ms: f64,
    pub cost_usd: f64,
    pub hallucinations: Vec<String>,
    pub retrieved_context: Vec<ContextItem>,
    pub explanations: HashMap<String, String>,
}

/// Fields the service contract requires on every success response.
const REQUIRED_FIELDS: &[&str] = &[
    "relevance_score",
    "completeness_score",
    "accuracy_score",
    "generated_response",
    "prompt_used",
    "latency_ms",
    "cost_usd",
    "hallucinations",
    "retrieved_context",
    "explanations",
];

impl EvaluationReport {
    /// Map a decoded response body field-by-field, naming the first missing
    /// required field as a contract violation.
    pub fn from_value(value: &Value) -> Result<Self, EvalError> {
        for field in REQUIRED_FIELDS {
            if value.get(field).is_none() {
                return Err(EvalError::MalformedResponse(format!(
                    "missing field `{field}`"
                )));
            }
        }

        serde_json::from_value(value.clone()).map_err(|e| EvalError::MalformedResponse(e.to_string()))
    }
}
