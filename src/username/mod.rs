//! Username rules for the target namespace and registry lookups

pub mod mojang;
pub mod validator;

// Re-export main functionality
pub use mojang::MojangChecker;
pub use validator::{is_valid_username, UsernameValidator, Violation};

use crate::error::Result;
use async_trait::async_trait;

/// Longest username the namespace accepts
pub const MAX_USERNAME_LENGTH: usize = 16;

/// Trait for registry lookups
#[async_trait]
pub trait ExistenceChecker: Send + Sync {
    /// Whether `name` is already registered
    async fn exists(&self, name: &str) -> Result<bool>;

    /// Get the checker name
    fn name(&self) -> &'static str;
}

/// Checker that never consults a registry and reports every name as free
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineChecker;

#[async_trait]
impl ExistenceChecker for OfflineChecker {
    async fn exists(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "offline"
    }
}
