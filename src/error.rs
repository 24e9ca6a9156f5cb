use crate::schema::FieldPath;
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// A single way in which a document failed its shape contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("missing required field")]
    Missing,

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown {union} type '{found}', expected one of: {expected}")]
    UnknownVariant {
        union: &'static str,
        found: String,
        expected: String,
    },

    #[error("'{found}' is not one of: {allowed}")]
    NotAllowed { found: String, allowed: String },

    #[error("expected the literal \"{expected}\", found \"{found}\"")]
    LiteralMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("value {value} is outside the range [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },

    #[error("at most {max} items are allowed, found {found}")]
    TooManyItems { max: usize, found: usize },

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("refers to unknown {target} '{id}'")]
    DanglingReference { target: &'static str, id: String },

    #[error("{0}")]
    Malformed(String),
}

/// A violation anchored at the field path where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation {
    pub path: FieldPath,
    pub violation: Violation,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.violation)
    }
}

/// Raised when a document fails validation. Always holds at least one violation.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("validation failed at {}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<SchemaViolation>,
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations.iter().join("; ")
}

impl ValidationError {
    /// Returns `None` when there is nothing to report.
    pub fn from_violations(violations: Vec<SchemaViolation>) -> Option<Self> {
        if violations.is_empty() {
            None
        } else {
            Some(Self { violations })
        }
    }

    pub fn single(path: FieldPath, violation: Violation) -> Self {
        Self {
            violations: vec![SchemaViolation { path, violation }],
        }
    }

    /// The first offending field path.
    pub fn path(&self) -> &FieldPath {
        &self.violations[0].path
    }

    pub fn primary(&self) -> &SchemaViolation {
        &self.violations[0]
    }

    pub fn violations(&self) -> &[SchemaViolation] {
        &self.violations
    }

    /// Whether any violation sits exactly at the dotted `path`.
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path.to_string() == path)
    }
}

/// Errors reported by the external conversation-flow platform.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("conversation flow '{flow_id}' not found")]
    NotFound { flow_id: String },

    #[error("platform responded with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("platform transport failed: {0}")]
    Transport(String),

    #[error("flow store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("platform returned malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by the exposed tool operations.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", not_found_message(.flow_id, .version))]
    NotFound {
        flow_id: String,
        version: Option<u32>,
    },

    #[error(transparent)]
    Platform(PlatformError),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

fn not_found_message(flow_id: &str, version: &Option<u32>) -> String {
    match version {
        Some(v) => format!("Conversation flow with ID {} (version {}) not found", flow_id, v),
        None => format!("Conversation flow with ID {} not found", flow_id),
    }
}

impl FlowError {
    /// Maps a platform error, lifting its not-found case into [`FlowError::NotFound`].
    pub fn from_platform(err: PlatformError, version: Option<u32>) -> Self {
        match err {
            PlatformError::NotFound { flow_id } => FlowError::NotFound { flow_id, version },
            other => FlowError::Platform(other),
        }
    }
}

/// Errors that can occur while loading [`crate::config::Settings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}
