//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so production logs can be
//! grepped by category:
//! - CFG_xxx: Configuration errors (fatal before any work starts)
//! - HOLDER_API_xxx: Ledger-indexing API errors
//! - RETRIEVAL_FAILED: Pagination failure after the retry budget is spent
//! - RPC_xxx: JSON-RPC node errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)?;
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Configuration Errors
    // ============================================
    /// Missing environment variable
    ConfigMissingEnv,
    /// Invalid configuration value
    ConfigInvalidValue,
    /// Unsupported chain ID
    ConfigUnsupportedChain,
    /// Missing API key
    ConfigMissingApiKey,

    // ============================================
    // Holder API Errors
    // ============================================
    /// Indexing API rate limited (HTTP 429)
    HolderApiRateLimited,
    /// Indexing API returned non-2xx status or transport failure
    HolderApiHttp,
    /// Indexing API response missing expected fields
    HolderApiInvalidResponse,
    /// Page request failed after exhausting the retry budget
    RetrievalFailed,

    // ============================================
    // RPC Errors
    // ============================================
    /// RPC connection failed
    RpcConnectionFailed,
    /// RPC returned error response
    RpcError,
    /// Invalid RPC response
    RpcInvalidResponse,

    // ============================================
    // Generic
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            // Configuration Errors
            Self::ConfigMissingEnv => "CFG_MISSING_ENV",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::ConfigUnsupportedChain => "CFG_UNSUPPORTED_CHAIN",
            Self::ConfigMissingApiKey => "CFG_MISSING_API_KEY",

            // Holder API Errors
            Self::HolderApiRateLimited => "HOLDER_API_RATE_LIMITED",
            Self::HolderApiHttp => "HOLDER_API_HTTP_ERROR",
            Self::HolderApiInvalidResponse => "HOLDER_API_INVALID_RESPONSE",
            Self::RetrievalFailed => "RETRIEVAL_FAILED",

            // RPC Errors
            Self::RpcConnectionFailed => "RPC_CONNECTION_FAILED",
            Self::RpcError => "RPC_ERROR",
            Self::RpcInvalidResponse => "RPC_INVALID_RESPONSE",

            // Generic
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Configuration errors abort before any work starts
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissingEnv
                | Self::ConfigInvalidValue
                | Self::ConfigUnsupportedChain
                | Self::ConfigMissingApiKey
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Missing environment variable
    pub fn missing_env(name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingEnv,
            format!("Missing environment variable: {}", name),
        )
    }

    /// Missing API key
    pub fn missing_api_key(key_name: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissingApiKey,
            format!("Missing API key: {}", key_name),
        )
    }

    /// Invalid configuration value
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// Unsupported chain
    pub fn unsupported_chain(chain_id: u64) -> Self {
        Self::new(
            ErrorCode::ConfigUnsupportedChain,
            format!("Unsupported chain_id: {}", chain_id),
        )
    }

    /// Indexing API rate limited
    pub fn rate_limited() -> Self {
        Self::new(ErrorCode::HolderApiRateLimited, "Rate limited (HTTP 429)")
    }

    /// Indexing API response missing expected fields
    pub fn invalid_holder_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::HolderApiInvalidResponse, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "JSON serialization error", err)
    }
}
