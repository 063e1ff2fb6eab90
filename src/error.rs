//! Error types for the object cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the object cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A group with this name is already registered
    #[error("duplicate registration of group {0}")]
    DuplicateGroup(String),

    /// A creation hook has already been installed on the registry
    #[error("creation hook registered more than once")]
    HookAlreadyRegistered,

    /// The group's getter failed to load a key
    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

impl CacheError {
    /// Returns true for wiring mistakes that should abort startup rather
    /// than be handled per request.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CacheError::DuplicateGroup(_) | CacheError::HookAlreadyRegistered
        )
    }
}

// == Result Type Alias ==
/// Convenience Result type for the object cache.
pub type Result<T> = std::result::Result<T, CacheError>;
