use async_trait::async_trait;
use sea_orm::DbErr;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::domain::{
    error::{RepositoryError, SaveUserQueryError},
    models::user::{User, UserId},
    repositories::user_repository::UserRepository,
};

#[derive(Default)]
struct Table {
    rows: Vec<User>,
    last_id: u64,
}

/// In-process `users` table with the same unique keys as the real schema.
///
/// Rows are stored the way the MySQL gateway reads them back: with an
/// assigned id and without timestamps.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn users(&self) -> Vec<User> {
        self.table.lock().await.rows.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save_user(&self, token: &CancellationToken, user: &User) -> Result<(), RepositoryError> {
        if token.is_cancelled() {
            return Err(RepositoryError::Cancelled {
                operation: "save_user",
            });
        }

        let mut table = self.table.lock().await;
        let duplicate_key = table.rows.iter().find_map(|row| {
            if row.user_name() == user.user_name() {
                Some(("users.username", user.user_name()))
            } else if row.email() == user.email() {
                Some(("users.email", user.email()))
            } else {
                None
            }
        });
        if let Some((key, value)) = duplicate_key {
            let source = DbErr::Custom(format!("Duplicate entry '{}' for key '{}'", value, key));
            return Err(SaveUserQueryError::unique_violation(user.clone(), source).into());
        }

        table.last_id += 1;
        let id = UserId::new(table.last_id);
        table.rows.push(User::reconstruct(
            id,
            user.email().to_string(),
            user.user_name().to_string(),
            user.password_hash().clone(),
        ));
        debug!(id = id.as_u64(), user_name = user.user_name(), "user stored in memory");
        Ok(())
    }

    async fn find_user_by_user_name(
        &self,
        token: &CancellationToken,
        user_name: &str,
    ) -> Result<Option<User>, RepositoryError> {
        if token.is_cancelled() {
            return Err(RepositoryError::Cancelled {
                operation: "find_user_by_user_name",
            });
        }
        let table = self.table.lock().await;
        Ok(table.rows.iter().rev().find(|u| u.user_name() == user_name).cloned())
    }

    async fn find_user_by_email(
        &self,
        token: &CancellationToken,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        if token.is_cancelled() {
            return Err(RepositoryError::Cancelled {
                operation: "find_user_by_email",
            });
        }
        let table = self.table.lock().await;
        Ok(table.rows.iter().rev().find(|u| u.email() == email).cloned())
    }
}
