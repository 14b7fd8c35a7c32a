//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use aula_core::CoreError;

/// Exit codes for scripting against the CLI.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const VALIDATION: i32 = 4;
    pub const CONFLICT: i32 = 5;
    pub const CONNECTION: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Not signed in")]
    #[diagnostic(code(aula::not_signed_in), help("Run: aula login (or aula login --admin)"))]
    NotSignedIn,

    #[error("Session expired")]
    #[diagnostic(code(aula::session_expired), help("Sign in again with: aula login"))]
    SessionExpired,

    #[error("{message}")]
    #[diagnostic(code(aula::auth_rejected))]
    AuthRejected { message: String },

    // ── Local validation ─────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(aula::validation))]
    Validation { message: String },

    #[error("Invalid {field}: {reason}")]
    #[diagnostic(code(aula::bad_argument))]
    BadArgument { field: String, reason: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Rejected by the backend: {message}")]
    #[diagnostic(code(aula::conflict))]
    Conflict { message: String },

    #[error("Backend error (HTTP {status}): {message}")]
    #[diagnostic(code(aula::api_error))]
    Api { status: u16, message: String },

    #[error("Cannot reach the backend: {reason}")]
    #[diagnostic(
        code(aula::unreachable),
        help("Check that the backend is running and --backend points at it.")
    )]
    Unreachable { reason: String },

    // ── Local environment ────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    #[diagnostic(code(aula::config))]
    Config(#[from] aula_config::ConfigError),

    #[error("Credential storage error: {message}")]
    #[diagnostic(code(aula::storage))]
    Storage { message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(aula::io))]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(aula::internal))]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotSignedIn | Self::SessionExpired | Self::AuthRejected { .. } => exit_code::AUTH,
            Self::Validation { .. } | Self::BadArgument { .. } => exit_code::VALIDATION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Unreachable { .. } => exit_code::CONNECTION,
            Self::Config(_) | Self::Storage { .. } | Self::Io(_) => exit_code::GENERAL,
            Self::Api { .. } | Self::Internal(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SessionExpired => Self::SessionExpired,
            CoreError::AuthRejected { message } => Self::AuthRejected { message },
            CoreError::MalformedToken { reason } => Self::AuthRejected {
                message: format!("Backend returned an unusable token: {reason}"),
            },
            CoreError::Validation(v) => Self::Validation {
                message: v.to_string(),
            },
            CoreError::Rejected { message } => Self::Conflict { message },
            CoreError::Api { status, message } => Self::Api { status, message },
            CoreError::Unreachable { reason } => Self::Unreachable { reason },
            CoreError::Storage { message } => Self::Storage { message },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}
