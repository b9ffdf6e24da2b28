//! Maps the compiler service's JSON payloads onto [`CompilationResult`].
//!
//! The backend renamed fields across revisions (`asmCode` became `asmResult`,
//! `dotCode` became `dotResult`) and not every revision sends an explicit
//! `success` flag. Every alias is listed once in the resolution table below,
//! in priority order, and the table is evaluated exactly once per response.

use crate::client::RawResponse;
use crate::model::{CompilationResult, CompileSuccess, Symbol};
use serde_json::{Map, Value};
use thiserror::Error;

/// HTTP status the service uses to signal an expired or missing session.
pub const SESSION_EXPIRED_STATUS: u16 = 401;

/// Message used when a failure carries no usable text.
pub const GENERIC_FAILURE_MESSAGE: &str = "The compiler service reported an error without details.";

const ASM_ALIASES: &[&str] = &["asmCode", "asmResult"];
const DIAGRAM_ALIASES: &[&str] = &["dotCode", "dotResult"];
const SYMBOL_TABLE_FIELD: &str = "symbolTable";
const SUCCESS_FIELD: &str = "success";
const ERROR_ALIASES: &[&str] = &["error", "message"];

/// Reasons a response body could not be turned into a canonical result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response body is a JSON {0}, expected an object")]
    NotAnObject(&'static str),

    #[error("symbolTable entry {index} is malformed: {reason}")]
    BadSymbol { index: usize, reason: String },
}

/// Normalize a raw HTTP response into exactly one canonical variant.
pub fn normalize(response: &RawResponse) -> Result<CompilationResult, NormalizeError> {
    if response.status == SESSION_EXPIRED_STATUS {
        return Ok(CompilationResult::SessionExpired);
    }

    let body: Value = serde_json::from_str(&response.body)
        .map_err(|e| NormalizeError::InvalidJson(e.to_string()))?;
    let fields = match &body {
        Value::Object(map) => map,
        other => return Err(NormalizeError::NotAnObject(json_kind(other))),
    };

    let succeeded = match fields.get(SUCCESS_FIELD) {
        Some(Value::Bool(flag)) => *flag,
        _ => response.is_success_status(),
    };

    if !succeeded {
        let message = ERROR_ALIASES
            .iter()
            .filter_map(|alias| fields.get(*alias).and_then(Value::as_str))
            .find(|m| !m.trim().is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE);
        return Ok(CompilationResult::Failure {
            message: message.to_string(),
        });
    }

    Ok(CompilationResult::Success(CompileSuccess {
        asm_text: first_string(fields, ASM_ALIASES)
            .unwrap_or_default()
            .to_string(),
        diagram_source: first_string(fields, DIAGRAM_ALIASES).map(str::to_string),
        symbols: decode_symbols(fields.get(SYMBOL_TABLE_FIELD))?,
    }))
}

/// First alias holding a JSON string. `null` and non-string values count as absent.
fn first_string<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a str> {
    aliases
        .iter()
        .find_map(|alias| fields.get(*alias).and_then(Value::as_str))
}

fn decode_symbols(value: Option<&Value>) -> Result<Vec<Symbol>, NormalizeError> {
    let Some(Value::Array(entries)) = value else {
        return Ok(Vec::new());
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            if !entry.is_object() {
                return Err(NormalizeError::BadSymbol {
                    index,
                    reason: format!("expected an object, found a {}", json_kind(entry)),
                });
            }
            serde_json::from_value(entry.clone()).map_err(|e| NormalizeError::BadSymbol {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
