//! Error handling for nick-forge

use thiserror::Error;

/// Main error type for nick-forge
#[derive(Error, Debug, Clone)]
pub enum NickForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Seed source '{source_name}' unavailable: {message}")]
    SeedUnavailable {
        source_name: String,
        message: String,
    },

    #[error("Existence check failed for '{name}': {message}")]
    ExistenceCheck { name: String, message: String },

    #[error("No valid username after {passes} repair passes (last candidate '{candidate}')")]
    NoConvergence { candidate: String, passes: u32 },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

impl NickForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a seed source error
    pub fn seed_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SeedUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an existence check error
    pub fn existence_check(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExistenceCheck {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a convergence failure
    pub fn no_convergence(candidate: impl Into<String>, passes: u32) -> Self {
        Self::NoConvergence {
            candidate: candidate.into(),
            passes,
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a rate limit error
    pub fn rate_limit(message: impl Into<String>, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or NICK_FORGE_* variables", message)
            }
            Self::SeedUnavailable { source_name, message } => {
                format!("⚠️  Seed source '{}' failed: {}\n💡 Pass seeds on the command line instead", source_name, message)
            }
            Self::ExistenceCheck { name, message } => {
                format!("⚠️  Could not check username '{}': {}", name, message)
            }
            Self::NoConvergence { candidate, passes } => {
                format!("❌ Gave up on '{}' after {} repair passes\n💡 The registry may be rejecting every name; try --offline to confirm", candidate, passes)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::RateLimit { message, retry_after } => {
                let retry = retry_after.map_or(String::new(), |s| format!(" Retry in {}s.", s));
                format!("⏱️  Rate limit exceeded: {}{}\n💡 Generate fewer names at once or wait", message, retry)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Raise NICK_FORGE_CHECK_TIMEOUT_SECS", operation, timeout_secs)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 This might be a temporary issue, try again", message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for NickForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::network("Request timed out", status_code, url)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_builder() {
            Self::network(format!("Malformed request: {}", err), status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NickForgeError>;
