pub mod argon2_password_hasher;
pub mod database;
pub mod user_repository;
