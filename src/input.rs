use crate::error::{EvalError, InputKind};
use crate::repair::repair;
use serde_json::Value;

/// Validate and parse both uploaded inputs. Runs entirely before any
/// network call: either both inputs parse or the run aborts here.
///
/// Checks are phased: presence of both inputs, then non-emptiness of both,
/// then repair and parse. An empty string is never reported as malformed.
pub fn validate(
    raw_conversation: Option<&str>,
    raw_context: Option<&str>,
) -> Result<(Value, Value), EvalError> {
    let conversation = require(raw_conversation, InputKind::Conversation)?;
    let context = require(raw_context, InputKind::Context)?;

    check_not_empty(conversation, InputKind::Conversation)?;
    check_not_empty(context, InputKind::Context)?;

    let conversation = parse(conversation, InputKind::Conversation)?;
    let context = parse(context, InputKind::Context)?;
    Ok((conversation, context))
}

fn require(raw: Option<&str>, kind: InputKind) -> Result<&str, EvalError> {
    raw.ok_or(EvalError::MissingFile(kind))
}

// An empty string is not a meaningful repair target; checked before repair.
fn check_not_empty(raw: &str, kind: InputKind) -> Result<(), EvalError> {
    if raw.trim().is_empty() {
        return Err(EvalError::EmptyFile(kind));
    }
    Ok(())
}

fn parse(raw: &str, kind: InputKind) -> Result<Value, EvalError> {
    // Valid JSON passes through untouched; repair only runs as a fallback.
    // String values containing fences or typographic quotes must survive.
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }

    serde_json::from_str(&repair(raw)).map_err(|e| EvalError::MalformedJson {
        kind,
        message: e.to_string(),
    })
}
