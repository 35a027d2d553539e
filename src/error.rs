/// Unified error types for the AMP URL API client
use crate::validation::ValidationError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Capabilities that depend on configuration supplied at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Schema discovery and batch URL lookups (needs an API key)
    Lookup,
    /// Signed cache updates (needs a loadable RSA private key)
    CacheUpdate,
}

impl Capability {
    pub const ALL: [Capability; 2] = [Capability::Lookup, Capability::CacheUpdate];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Lookup => write!(f, "lookup (no google api key configured)"),
            Capability::CacheUpdate => write!(f, "cache update (no rsa private key loaded)"),
        }
    }
}

/// Main error type for the client
#[derive(Error, Debug)]
pub enum AmpError {
    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Private key could not be read or decoded
    #[error("Cannot read private key {path}: {reason}")]
    KeyLoad { path: PathBuf, reason: String },

    /// AMP validator reported a non-PASS status
    #[error("AMP validation failed for url: {url}\nerrors: {}", format_validation_errors(.errors))]
    ValidationFailed {
        url: String,
        errors: Vec<ValidationError>,
    },

    /// Signing attempted without a loaded key
    #[error("No RSA Key to Sign.")]
    SigningUnavailable,

    /// Operation gated behind a capability that was disabled at construction
    #[error("Capability disabled: {0}")]
    CapabilityDisabled(Capability),

    /// Transport errors, propagated as-is
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Target URL could not be used
    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    /// Signature generation failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Remote returned something we could not interpret
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl AmpError {
    /// Validator errors carried by a failed validation, if any
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            AmpError::ValidationFailed { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<url::ParseError> for AmpError {
    fn from(err: url::ParseError) -> Self {
        AmpError::InvalidUrl(err.to_string())
    }
}

impl From<rsa::Error> for AmpError {
    fn from(err: rsa::Error) -> Self {
        AmpError::Signing(err.to_string())
    }
}

/// Result type alias for client operations
pub type AmpResult<T> = Result<T, AmpError>;
