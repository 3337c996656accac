//! Stand-ins for the persistence gateway, for exercising the registration
//! flow without a live database.

pub mod in_memory_user_repository;
pub mod user_repository_stub;

pub use in_memory_user_repository::InMemoryUserRepository;
pub use user_repository_stub::UserRepositoryStub;
