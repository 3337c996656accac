use std::sync::Arc;

use rstest::*;
use tokio_util::sync::CancellationToken;
use user_registration::{
    config::HashingConfig,
    domain::{
        error::{DomainError, RepositoryError},
        repositories::user_repository::UserRepository,
        services::password_service::PasswordHasher,
    },
    infrastructure::argon2_password_hasher::Argon2PasswordHasher,
    mock::InMemoryUserRepository,
    usecase::register_user_usecase::RegisterUserUsecase,
};

type Usecase = RegisterUserUsecase<Arc<InMemoryUserRepository>, Argon2PasswordHasher>;

#[fixture]
fn hasher() -> Argon2PasswordHasher {
    Argon2PasswordHasher::from_config(&HashingConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

#[fixture]
fn setup(hasher: Argon2PasswordHasher) -> (Arc<InMemoryUserRepository>, Usecase) {
    let repo = Arc::new(InMemoryUserRepository::new());
    let usecase = RegisterUserUsecase::new(repo.clone(), hasher);
    (repo, usecase)
}

#[rstest]
#[tokio::test]
async fn registering_into_empty_store_persists_one_hashed_row(
    setup: (Arc<InMemoryUserRepository>, Usecase),
    hasher: Argon2PasswordHasher,
) {
    let (repo, usecase) = setup;
    let token = CancellationToken::new();

    usecase
        .register_user(&token, "a@x.com", "alice", "pw")
        .await
        .unwrap();

    let users = repo.users().await;
    assert_eq!(users.len(), 1);
    let alice = &users[0];
    assert_eq!(alice.email(), "a@x.com");
    assert_eq!(alice.user_name(), "alice");
    assert!(alice.id().is_some());

    let hash = alice.password_hash();
    assert!(!hash.as_str().is_empty());
    assert_ne!(hash.as_str(), "pw");
    assert!(hasher.verify("pw", hash).unwrap());
}

#[rstest]
#[tokio::test]
async fn repeating_the_same_registration_is_a_user_name_conflict(
    setup: (Arc<InMemoryUserRepository>, Usecase),
) {
    let (repo, usecase) = setup;
    let token = CancellationToken::new();

    usecase
        .register_user(&token, "a@x.com", "alice", "pw")
        .await
        .unwrap();
    let err = usecase
        .register_user(&token, "a@x.com", "alice", "pw")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::DuplicateUserName(ref name) if name == "alice"));
    assert!(err.is_conflict());
    assert_eq!(repo.len().await, 1);
}

#[rstest]
#[tokio::test]
async fn taken_email_with_free_user_name_is_an_email_conflict(
    setup: (Arc<InMemoryUserRepository>, Usecase),
) {
    let (repo, usecase) = setup;
    let token = CancellationToken::new();

    usecase
        .register_user(&token, "a@x.com", "alice", "pw")
        .await
        .unwrap();
    let err = usecase
        .register_user(&token, "a@x.com", "bob", "pw")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::DuplicateEmail(ref email) if email == "a@x.com"));
    assert_eq!(repo.len().await, 1);
}

#[rstest]
#[tokio::test]
async fn distinct_users_each_get_a_row(setup: (Arc<InMemoryUserRepository>, Usecase)) {
    let (repo, usecase) = setup;
    let token = CancellationToken::new();

    for (email, name) in [("a@x.com", "alice"), ("b@x.com", "bob"), ("c@x.com", "carol")] {
        usecase.register_user(&token, email, name, "pw").await.unwrap();
    }

    assert_eq!(repo.len().await, 3);
    let bob = repo
        .find_user_by_user_name(&token, "bob")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob.email(), "b@x.com");
}

#[rstest]
#[tokio::test]
async fn lookups_without_writes_are_idempotent(setup: (Arc<InMemoryUserRepository>, Usecase)) {
    let (repo, usecase) = setup;
    let token = CancellationToken::new();
    usecase
        .register_user(&token, "a@x.com", "alice", "pw")
        .await
        .unwrap();

    let first = repo.find_user_by_user_name(&token, "alice").await.unwrap();
    let second = repo.find_user_by_user_name(&token, "alice").await.unwrap();
    assert_eq!(first, second);

    let missing = repo.find_user_by_email(&token, "nobody@x.com").await.unwrap();
    assert!(missing.is_none());
}

#[rstest]
#[tokio::test]
async fn cancelled_registration_writes_nothing(setup: (Arc<InMemoryUserRepository>, Usecase)) {
    let (repo, usecase) = setup;
    let token = CancellationToken::new();
    token.cancel();

    let err = usecase
        .register_user(&token, "a@x.com", "alice", "pw")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::Repository(RepositoryError::Cancelled { .. })
    ));
    assert!(repo.is_empty().await);
}
