use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    error::RepositoryError, models::user::User, repositories::user_repository::UserRepository,
};

pub type SaveUserFn = Box<dyn Fn(&User) -> Result<(), RepositoryError> + Send + Sync>;
pub type FindUserFn = Box<dyn Fn(&str) -> Result<Option<User>, RepositoryError> + Send + Sync>;

/// Gateway whose every method delegates to a caller-supplied closure.
///
/// The default stub finds nothing and accepts every save. Calls are counted so
/// tests can assert which methods ran.
pub struct UserRepositoryStub {
    pub save_user_fn: SaveUserFn,
    pub find_user_by_user_name_fn: FindUserFn,
    pub find_user_by_email_fn: FindUserFn,
    save_user_calls: AtomicUsize,
    find_user_by_user_name_calls: AtomicUsize,
    find_user_by_email_calls: AtomicUsize,
}

impl UserRepositoryStub {
    pub fn new() -> Self {
        Self {
            save_user_fn: Box::new(|_| Ok(())),
            find_user_by_user_name_fn: Box::new(|_| Ok(None)),
            find_user_by_email_fn: Box::new(|_| Ok(None)),
            save_user_calls: AtomicUsize::new(0),
            find_user_by_user_name_calls: AtomicUsize::new(0),
            find_user_by_email_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_save_user(
        mut self,
        f: impl Fn(&User) -> Result<(), RepositoryError> + Send + Sync + 'static,
    ) -> Self {
        self.save_user_fn = Box::new(f);
        self
    }

    pub fn with_find_user_by_user_name(
        mut self,
        f: impl Fn(&str) -> Result<Option<User>, RepositoryError> + Send + Sync + 'static,
    ) -> Self {
        self.find_user_by_user_name_fn = Box::new(f);
        self
    }

    pub fn with_find_user_by_email(
        mut self,
        f: impl Fn(&str) -> Result<Option<User>, RepositoryError> + Send + Sync + 'static,
    ) -> Self {
        self.find_user_by_email_fn = Box::new(f);
        self
    }

    pub fn save_user_calls(&self) -> usize {
        self.save_user_calls.load(Ordering::SeqCst)
    }

    pub fn find_user_by_user_name_calls(&self) -> usize {
        self.find_user_by_user_name_calls.load(Ordering::SeqCst)
    }

    pub fn find_user_by_email_calls(&self) -> usize {
        self.find_user_by_email_calls.load(Ordering::SeqCst)
    }
}

impl Default for UserRepositoryStub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for UserRepositoryStub {
    async fn save_user(&self, _token: &CancellationToken, user: &User) -> Result<(), RepositoryError> {
        self.save_user_calls.fetch_add(1, Ordering::SeqCst);
        (self.save_user_fn)(user)
    }

    async fn find_user_by_user_name(
        &self,
        _token: &CancellationToken,
        user_name: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.find_user_by_user_name_calls.fetch_add(1, Ordering::SeqCst);
        (self.find_user_by_user_name_fn)(user_name)
    }

    async fn find_user_by_email(
        &self,
        _token: &CancellationToken,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.find_user_by_email_calls.fetch_add(1, Ordering::SeqCst);
        (self.find_user_by_email_fn)(email)
    }
}
