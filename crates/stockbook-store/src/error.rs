//! # Store Error Types
//!
//! Error types for store, service and configuration operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Domain      │  │    Session      │  │     Transport           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core(..)       │  │  NotAuthent.    │  │  Network                │ │
//! │  │  Rejected       │  │  Unauthorized   │  │  Http                   │ │
//! │  │  NotFound       │  │                 │  │  Decode                 │ │
//! │  │                 │  │                 │  │  Unconfirmed            │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │  Configuration  │                                                    │
//! │  │                 │                                                    │
//! │  │  InvalidConfig  │                                                    │
//! │  │  ConfigLoad/Save│                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant answers [`StoreError::kind`] and [`StoreError::code`] with
//! the same taxonomy the core uses, so callers handle local and remote
//! rejections alike.

use stockbook_core::{CoreError, ErrorCode, ErrorKind};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for sale ledger operations.
pub type LedgerResult<T> = StoreResult<T>;

/// Store error type covering local rule violations and remote failures.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A business rule rejected the operation before or inside the store.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The remote service rejected the request (400/409/422).
    #[error("Rejected by store: {message}")]
    Rejected {
        code: Option<ErrorCode>,
        message: String,
    },

    /// The remote service has no such resource (404).
    #[error("Not found: {0}")]
    NotFound(String),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// No credential is configured; nothing was sent.
    #[error("Not authenticated. Set a token before calling the store.")]
    NotAuthenticated,

    /// The credential was refused and has been dropped.
    #[error("Session rejected: {0}")]
    Unauthorized(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never completed (connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// Unexpected status from the remote service.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The store committed a mutation but its outcome could not be read
    /// back. Never reported as not-found; the cache must be re-fetched.
    #[error("Change applied but not confirmed: {0}")]
    Unconfirmed(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl From<stockbook_core::ValidationError> for StoreError {
    fn from(err: stockbook_core::ValidationError) -> Self {
        StoreError::Core(err.into())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl StoreError {
    /// Machine-readable code for this error.
    ///
    /// A remote rejection without a code is reported as a validation error.
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Core(err) => err.code(),
            StoreError::Rejected { code, .. } => code.unwrap_or(ErrorCode::ValidationError),
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::NotAuthenticated | StoreError::Unauthorized(_) => ErrorCode::Unauthorized,
            StoreError::Network(_)
            | StoreError::Http { .. }
            | StoreError::Decode(_)
            | StoreError::Unconfirmed(_)
            | StoreError::InvalidConfig(_)
            | StoreError::ConfigLoadFailed(_)
            | StoreError::ConfigSaveFailed(_) => ErrorCode::Internal,
        }
    }

    /// Error category, which decides how the failure is handled.
    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Returns true if the local cache may now be out of date and should be
    /// re-fetched.
    pub fn needs_refresh(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}
