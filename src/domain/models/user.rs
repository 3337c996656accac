use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError, models::password::HashedPassword,
    services::password_service::PasswordHasher,
};

/// Store-assigned identifier of a persisted user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(u64);
impl UserId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: Option<UserId>,
    email: String,
    user_name: String,
    #[serde(skip_serializing)]
    password_hash: HashedPassword,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a new user, hashing `raw_password` with `hasher`.
    ///
    /// `id` is `None` until the store assigns one. The raw password is not
    /// kept anywhere on the returned value.
    pub fn new<P: PasswordHasher>(
        id: Option<UserId>,
        email: String,
        user_name: String,
        raw_password: &str,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        hasher: &P,
    ) -> Result<Self, DomainError> {
        if raw_password.is_empty() {
            return Err(DomainError::EmptyPassword);
        }

        let password_hash = hasher.hash(raw_password)?;
        Ok(Self {
            id,
            email,
            user_name,
            password_hash,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        })
    }

    /// Rebuild a user from a stored row. The `users` table keeps no
    /// timestamps, so none are set.
    pub fn reconstruct(
        id: UserId,
        email: String,
        user_name: String,
        password_hash: HashedPassword,
    ) -> Self {
        Self {
            id: Some(id),
            email,
            user_name,
            password_hash,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn id(&self) -> Option<UserId> {
        self.id
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn user_name(&self) -> &str {
        &self.user_name
    }
    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}
