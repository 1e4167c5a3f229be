use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Key used for messages that are not attached to a single field.
pub const NON_FIELD: &str = "non_field_errors";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not logged in or session expired")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Field-level messages returned by the server, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Parse a REST error body.
    ///
    /// Accepts `{"field": ["msg", ...]}`, `{"field": "msg"}`, a bare list of
    /// messages, and the `detail`/`error` shapes. Anything else becomes a
    /// single non-field message carrying the raw body.
    pub fn from_body(body: &str) -> Self {
        let mut errors = Self::new();
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    let field = match key.as_str() {
                        "detail" | "error" => NON_FIELD.to_string(),
                        _ => key,
                    };
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                errors.add(field.clone(), value_text(item));
                            }
                        }
                        other => errors.add(field, value_text(other)),
                    }
                }
            }
            Ok(Value::Array(items)) => {
                for item in items {
                    errors.add(NON_FIELD, value_text(item));
                }
            }
            _ => {
                let trimmed = body.trim();
                if !trimmed.is_empty() {
                    errors.add(NON_FIELD, trimmed);
                }
            }
        }
        errors
    }
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| {
                if field == NON_FIELD {
                    messages.join(" ")
                } else {
                    format!("{}: {}", field, messages.join(" "))
                }
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}
