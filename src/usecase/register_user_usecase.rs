use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::domain::{
    error::DomainError, models::user::User, repositories::user_repository::UserRepository,
    services::password_service::PasswordHasher,
};

pub struct RegisterUserUsecase<R: UserRepository, P: PasswordHasher> {
    user_repository: R,
    password_hasher: P,
}

impl<R: UserRepository, P: PasswordHasher> RegisterUserUsecase<R, P> {
    pub fn new(user_repository: R, password_hasher: P) -> Self {
        Self {
            user_repository,
            password_hasher,
        }
    }

    pub fn user_repository(&self) -> &R {
        &self.user_repository
    }

    /// Register a new user after checking the user name, then the email, for
    /// an existing owner. The first conflict found is reported.
    ///
    /// The lookups and the insert are separate transactions, so a concurrent
    /// registration can still win the race; the store's unique keys then
    /// reject the insert with a `SaveUserQueryError`.
    #[instrument(skip(self, token, password))]
    pub async fn register_user(
        &self,
        token: &CancellationToken,
        email: &str,
        user_name: &str,
        password: &str,
    ) -> Result<(), DomainError> {
        if self
            .user_repository
            .find_user_by_user_name(token, user_name)
            .await?
            .is_some()
        {
            info!("user name already taken");
            return Err(DomainError::DuplicateUserName(user_name.to_string()));
        }

        if self
            .user_repository
            .find_user_by_email(token, email)
            .await?
            .is_some()
        {
            info!("email already taken");
            return Err(DomainError::DuplicateEmail(email.to_string()));
        }

        // Hash password
        let now = Utc::now();
        let user = User::new(
            None,
            email.to_string(),
            user_name.to_string(),
            password,
            now,
            now,
            &self.password_hasher,
        )?;

        self.user_repository.save_user(token, &user).await?;

        info!("user registered");
        Ok(())
    }
}
