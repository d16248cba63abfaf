use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of warnings kept in a [`Diagnostics`] value.
///
/// Further warnings are still counted in `total_warnings`.
pub const MAX_WARNINGS: usize = 50;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Identifier,
    Style,
    Aggregation,
    Placement,
    Manifest,
    Decode,
}

/// Numeric diagnostic code (E100–E699).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Identifier (E100–E199) ──
    pub const DEGENERATE_IDENTIFIER: Self = Self(100);

    // ── Style (E200–E299) ──
    pub const UNKNOWN_STYLE: Self = Self(200);

    // ── Aggregation (E300–E399) ──
    pub const IDENTIFIER_COLLISION: Self = Self(300);
    pub const EMPTY_GUARD_SEED: Self = Self(301);

    // ── Placement (E400–E499) ──
    pub const NAMESPACE_IGNORED: Self = Self(400);
    pub const INVALID_NAMESPACE_SEGMENT: Self = Self(401);

    // ── Manifest (E500–E599) ──
    pub const MANIFEST_INVALID: Self = Self(500);

    // ── Decode (E600–E699) ──
    pub const MALFORMED_BODY: Self = Self(600);

    /// Get the category for this code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Identifier,
            200..=299 => ErrorCategory::Style,
            300..=399 => ErrorCategory::Aggregation,
            400..=499 => ErrorCategory::Placement,
            500..=599 => ErrorCategory::Manifest,
            _ => ErrorCategory::Decode,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::Style => write!(f, "style"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::Placement => write!(f, "placement"),
            Self::Manifest => write!(f, "manifest"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

/// Fatal errors raised by the embedding pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    /// A style name from configuration is not one of the four encoding styles.
    #[error("unknown encoding style `{0}`")]
    UnknownStyle(String),

    /// Two declarations resolve to the same fully-qualified identifier, or a
    /// macro would rewrite another name or the include guard.
    #[error(
        "identifier collision on `{key}`: resource #{first_index} `{first_name}` \
         and resource #{second_index} `{second_name}`"
    )]
    IdentifierCollision {
        key: String,
        first_index: usize,
        first_name: String,
        second_index: usize,
        second_name: String,
    },

    /// A namespace segment is not a legal identifier.
    #[error("invalid namespace segment `{0}`")]
    InvalidNamespaceSegment(String),

    /// A JSON manifest could not be parsed.
    #[error("invalid manifest: {0}")]
    ManifestInvalid(String),

    /// An encoded body could not be decoded back to bytes.
    #[error("malformed encoded body: {0}")]
    MalformedBody(String),
}

impl EmbedError {
    /// The stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownStyle(_) => ErrorCode::UNKNOWN_STYLE,
            Self::IdentifierCollision { .. } => ErrorCode::IDENTIFIER_COLLISION,
            Self::InvalidNamespaceSegment(_) => ErrorCode::INVALID_NAMESPACE_SEGMENT,
            Self::ManifestInvalid(_) => ErrorCode::MANIFEST_INVALID,
            Self::MalformedBody(_) => ErrorCode::MALFORMED_BODY,
        }
    }
}

impl From<serde_json::Error> for EmbedError {
    fn from(err: serde_json::Error) -> Self {
        Self::ManifestInvalid(err.to_string())
    }
}

/// A structured diagnostic, serializable for build tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    /// Derived from `code`.
    pub category: ErrorCategory,
    pub message: String,
    /// The resource or seed the diagnostic is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Diagnostic {
    /// Create a warning.
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            category: code.category(),
            message: message.into(),
            subject: None,
        }
    }

    /// Create an error diagnostic from a fatal [`EmbedError`].
    pub fn from_error(err: &EmbedError) -> Self {
        let code = err.code();
        Self {
            code,
            severity: Severity::Error,
            category: code.category(),
            message: err.to_string(),
            subject: None,
        }
    }

    /// Attach the subject (resource name, seed) of this diagnostic.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(
                f,
                "{}: {} [{}] {}",
                subject, self.code, self.category, self.message
            ),
            None => write!(f, "{} [{}] {}", self.code, self.category, self.message),
        }
    }
}

/// Errors and warnings collected over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl Diagnostics {
    /// Create an empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error.
    pub fn push_error(&mut self, error: Diagnostic) {
        self.errors.push(error);
        self.total_errors += 1;
    }

    /// Add a warning, respecting the [`MAX_WARNINGS`] limit.
    pub fn push_warning(&mut self, warning: Diagnostic) {
        if self.warnings.len() < MAX_WARNINGS {
            self.warnings.push(warning);
        }
        self.total_warnings += 1;
    }

    /// Whether a warning with `code` was recorded.
    pub fn has_warning(&self, code: ErrorCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::DEGENERATE_IDENTIFIER.category(),
            ErrorCategory::Identifier
        );
        assert_eq!(ErrorCode::UNKNOWN_STYLE.category(), ErrorCategory::Style);
        assert_eq!(
            ErrorCode::IDENTIFIER_COLLISION.category(),
            ErrorCategory::Aggregation
        );
        assert_eq!(
            ErrorCode::NAMESPACE_IGNORED.category(),
            ErrorCategory::Placement
        );
        assert_eq!(
            ErrorCode::MANIFEST_INVALID.category(),
            ErrorCategory::Manifest
        );
        assert_eq!(ErrorCode::MALFORMED_BODY.category(), ErrorCategory::Decode);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::IDENTIFIER_COLLISION.to_string(), "E300");
    }

    #[test]
    fn test_collision_message_names_both_resources() {
        let err = EmbedError::IdentifierCollision {
            key: "app::logo".into(),
            first_index: 0,
            first_name: "logo.png".into(),
            second_index: 2,
            second_name: "logo.svg".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("app::logo"));
        assert!(msg.contains("#0 `logo.png`"));
        assert!(msg.contains("#2 `logo.svg`"));
        assert_eq!(err.code(), ErrorCode::IDENTIFIER_COLLISION);
    }

    #[test]
    fn test_warning_limit() {
        let mut diags = Diagnostics::empty();
        for i in 0..MAX_WARNINGS + 5 {
            diags.push_warning(Diagnostic::warning(
                ErrorCode::DEGENERATE_IDENTIFIER,
                format!("warning {i}"),
            ));
        }
        assert_eq!(diags.warnings.len(), MAX_WARNINGS);
        assert_eq!(diags.total_warnings, MAX_WARNINGS + 5);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_diagnostic_serialization() {
        let diag = Diagnostic::warning(ErrorCode::NAMESPACE_IGNORED, "ignored")
            .with_subject("version.txt");
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["category"], "placement");
        assert_eq!(json["code"], 400);
        assert_eq!(json["subject"], "version.txt");
    }
}
