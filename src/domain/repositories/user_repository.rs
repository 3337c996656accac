use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{error::RepositoryError, models::user::User};

/// Persistence gateway for the `users` table.
///
/// Every call runs in its own transaction and is resolved (committed or
/// rolled back) before it returns, including when `token` is cancelled.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert `user`. A duplicate user name or email surfaces as
    /// [`RepositoryError::SaveUserQuery`].
    async fn save_user(&self, token: &CancellationToken, user: &User) -> Result<(), RepositoryError>;

    /// `Ok(None)` when no row matches.
    async fn find_user_by_user_name(
        &self,
        token: &CancellationToken,
        user_name: &str,
    ) -> Result<Option<User>, RepositoryError>;

    /// `Ok(None)` when no row matches.
    async fn find_user_by_email(
        &self,
        token: &CancellationToken,
        email: &str,
    ) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
impl<T: UserRepository + ?Sized> UserRepository for Arc<T> {
    async fn save_user(&self, token: &CancellationToken, user: &User) -> Result<(), RepositoryError> {
        (**self).save_user(token, user).await
    }

    async fn find_user_by_user_name(
        &self,
        token: &CancellationToken,
        user_name: &str,
    ) -> Result<Option<User>, RepositoryError> {
        (**self).find_user_by_user_name(token, user_name).await
    }

    async fn find_user_by_email(
        &self,
        token: &CancellationToken,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        (**self).find_user_by_email(token, email).await
    }
}
