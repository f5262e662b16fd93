use serde::{Deserialize, Serialize};

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A recoverable problem found while converting one file.
///
/// `kind` is the raw translation unit kind that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub kind: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: String, kind: impl Into<String>) -> Self {
        Self {
            severity,
            message,
            kind: kind.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: String) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn error(message: String, kind: impl Into<String>) -> Self {
        Self::new(Severity::Error, message, kind)
    }

    pub fn warning(message: String, kind: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message, kind)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
