use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::domain::models::user::User;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("userName {0} is already used")]
    DuplicateUserName(String),

    #[error("email {0} is already used")]
    DuplicateEmail(String),

    #[error("Empty password")]
    EmptyPassword,

    #[error("Empty password hash")]
    EmptyPasswordHash,

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl DomainError {
    /// True when registration was rejected because the user name or email is
    /// taken, whether caught by the lookups or by the store's unique keys.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::DuplicateUserName(_) | Self::DuplicateEmail(_) => true,
            Self::Repository(RepositoryError::SaveUserQuery(err)) => err.is_unique_violation(),
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{operation}: could not begin transaction on {table}: {source}")]
    BeginTransaction {
        operation: &'static str,
        table: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("{operation}: query on {table} failed: {source}")]
    QueryExecution {
        operation: &'static str,
        table: &'static str,
        #[source]
        source: DbErr,
    },

    #[error(transparent)]
    SaveUserQuery(#[from] SaveUserQueryError),

    #[error("{operation}: could not scan row from {table}: {source}")]
    Scan {
        operation: &'static str,
        table: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("{operation}: could not commit transaction on {table}: {source}")]
    Commit {
        operation: &'static str,
        table: &'static str,
        #[source]
        source: DbErr,
    },

    #[error("{operation}: cancelled")]
    Cancelled { operation: &'static str },
}

/// Insert of a new user row failed and the transaction was rolled back.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SaveUserQueryError {
    user: User,
    message: String,
    unique_violation: bool,
    #[source]
    source: DbErr,
}

impl SaveUserQueryError {
    pub fn new(user: User, source: DbErr) -> Self {
        let unique_violation = matches!(source.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)));
        Self::build(user, source, unique_violation)
    }

    /// For stores that detect the duplicate key themselves and only have a
    /// generic `DbErr` to report it with.
    pub fn unique_violation(user: User, source: DbErr) -> Self {
        Self::build(user, source, true)
    }

    fn build(user: User, source: DbErr, unique_violation: bool) -> Self {
        let message = format!("save_user on users failed: {}", source);
        Self {
            user,
            message,
            unique_violation,
            source,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_unique_violation(&self) -> bool {
        self.unique_violation
    }

    pub fn store_error(&self) -> &DbErr {
        &self.source
    }
}
