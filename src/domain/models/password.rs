use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Value object representing a hashed password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Wrap an already hashed string. An empty hash is never valid.
    pub fn new(hash: String) -> Result<Self, DomainError> {
        if hash.is_empty() {
            return Err(DomainError::EmptyPasswordHash);
        }
        Ok(Self(hash))
    }

    /// Get the hash as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
