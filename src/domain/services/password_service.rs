use crate::domain::{error::DomainError, models::password::HashedPassword};

/// Service for hashing and verifying passwords
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text password with a fresh salt
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError>;

    /// Verify a plain text password against a hashed password
    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError>;
}
