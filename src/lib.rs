//! User registration: uniqueness checks, password hashing, and a
//! transactional gateway over the `users` table.
//!
//! ```rust,no_run
//! use tokio_util::sync::CancellationToken;
//! use user_registration::{
//!     config::{DatabaseConfig, HashingConfig},
//!     infrastructure::{
//!         argon2_password_hasher::Argon2PasswordHasher, database,
//!         user_repository::MySqlUserRepository,
//!     },
//!     usecase::register_user_usecase::RegisterUserUsecase,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! user_registration::telemetry::init_tracing()?;
//! let db = database::connect(&DatabaseConfig::from_env()?).await?;
//! let hasher = Argon2PasswordHasher::from_config(&HashingConfig::from_env()?)?;
//! let usecase = RegisterUserUsecase::new(MySqlUserRepository::new(db), hasher);
//!
//! usecase
//!     .register_user(&CancellationToken::new(), "a@x.com", "alice", "pw")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod mock;
pub mod telemetry;
pub mod usecase;
