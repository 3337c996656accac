use argon2::{
    Algorithm, Argon2, Params, PasswordHash as Argon2Hash, Version,
    password_hash::{PasswordHasher as Argon2Hasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::error;

use crate::{
    config::HashingConfig,
    domain::{
        error::DomainError, models::password::HashedPassword,
        services::password_service::PasswordHasher,
    },
};

/// Argon2id hasher producing PHC strings with a fresh random salt per call.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Fails with [`DomainError::Hashing`] on cost parameters argon2 does not
    /// support (e.g. memory below 8 KiB per lane, zero iterations).
    pub fn from_config(config: &HashingConfig) -> Result<Self, DomainError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| {
                error!(error = %e, ?config, "unsupported argon2 parameters");
                DomainError::Hashing(e.to_string())
            })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_password: &str) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                DomainError::Hashing(e.to_string())
            })?
            .to_string();

        HashedPassword::new(hash)
    }

    fn verify(&self, plain_password: &str, hashed_password: &HashedPassword) -> Result<bool, DomainError> {
        let parsed_hash = Argon2Hash::new(hashed_password.as_str())
            .map_err(|e| DomainError::Hashing(e.to_string()))?;

        Ok(self
            .argon2()
            .verify_password(plain_password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
