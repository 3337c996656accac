use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, FromQueryResult, Statement,
    TransactionTrait,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::domain::{
    error::{RepositoryError, SaveUserQueryError},
    models::{
        password::HashedPassword,
        user::{User, UserId},
    },
    repositories::user_repository::UserRepository,
};

const TABLE: &str = "users";

const SAVE_USER: &str = "save_user";
const FIND_BY_USER_NAME: &str = "find_user_by_user_name";
const FIND_BY_EMAIL: &str = "find_user_by_email";

const INSERT_USER: &str = "INSERT INTO users (email, username, password) VALUES (?, ?, ?)";
const SELECT_BY_USER_NAME: &str =
    "SELECT id, email, username, password FROM users WHERE username = ?";
const SELECT_BY_EMAIL: &str = "SELECT id, email, username, password FROM users WHERE email = ?";

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: u64,
    email: String,
    username: String,
    password: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, DbErr> {
        let password_hash =
            HashedPassword::new(self.password).map_err(|e| DbErr::Type(e.to_string()))?;
        Ok(User::reconstruct(
            UserId::new(self.id),
            self.email,
            self.username,
            password_hash,
        ))
    }
}

/// Transactional gateway over the MySQL `users` table.
#[derive(Clone)]
pub struct MySqlUserRepository {
    db: Arc<DatabaseConnection>,
}

impl MySqlUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    async fn begin(
        &self,
        token: &CancellationToken,
        operation: &'static str,
    ) -> Result<DatabaseTransaction, RepositoryError> {
        if token.is_cancelled() {
            return Err(RepositoryError::Cancelled { operation });
        }

        match until_cancelled(token, self.db.begin()).await {
            None => Err(RepositoryError::Cancelled { operation }),
            Some(Ok(txn)) => {
                debug!(operation, "transaction begun");
                Ok(txn)
            }
            Some(Err(source)) => {
                error!(operation, error = %source, "begin transaction failed");
                Err(RepositoryError::BeginTransaction {
                    operation,
                    table: TABLE,
                    source,
                })
            }
        }
    }

    async fn find_one(
        &self,
        token: &CancellationToken,
        operation: &'static str,
        sql: &'static str,
        key: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let txn = self.begin(token, operation).await?;
        let result = select_last(&txn, token, operation, sql, key).await;
        finish(txn, operation, result).await
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn save_user(&self, token: &CancellationToken, user: &User) -> Result<(), RepositoryError> {
        let txn = self.begin(token, SAVE_USER).await?;
        let result = insert_user(&txn, token, user).await;
        finish(txn, SAVE_USER, result).await
    }

    async fn find_user_by_user_name(
        &self,
        token: &CancellationToken,
        user_name: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.find_one(token, FIND_BY_USER_NAME, SELECT_BY_USER_NAME, user_name)
            .await
    }

    async fn find_user_by_email(
        &self,
        token: &CancellationToken,
        email: &str,
    ) -> Result<Option<User>, RepositoryError> {
        self.find_one(token, FIND_BY_EMAIL, SELECT_BY_EMAIL, email).await
    }
}

async fn insert_user(
    txn: &DatabaseTransaction,
    token: &CancellationToken,
    user: &User,
) -> Result<(), RepositoryError> {
    let stmt = Statement::from_sql_and_values(
        txn.get_database_backend(),
        INSERT_USER,
        [
            user.email().into(),
            user.user_name().into(),
            user.password_hash().as_str().into(),
        ],
    );

    match until_cancelled(token, txn.execute(stmt)).await {
        None => Err(RepositoryError::Cancelled {
            operation: SAVE_USER,
        }),
        Some(Ok(_)) => Ok(()),
        Some(Err(source)) => {
            error!(user_name = user.user_name(), error = %source, "insert into users failed");
            Err(SaveUserQueryError::new(user.clone(), source).into())
        }
    }
}

// Keeps the last row scanned; the unique keys on `users` mean there is at most one.
async fn select_last(
    txn: &DatabaseTransaction,
    token: &CancellationToken,
    operation: &'static str,
    sql: &'static str,
    key: &str,
) -> Result<Option<User>, RepositoryError> {
    let stmt = Statement::from_sql_and_values(txn.get_database_backend(), sql, [key.into()]);

    let rows = match until_cancelled(token, txn.query_all(stmt)).await {
        None => return Err(RepositoryError::Cancelled { operation }),
        Some(rows) => rows.map_err(|source| RepositoryError::QueryExecution {
            operation,
            table: TABLE,
            source,
        })?,
    };

    if rows.len() > 1 {
        warn!(operation, rows = rows.len(), "lookup matched more than one row");
    }

    let mut found = None;
    for row in &rows {
        let user = UserRow::from_query_result(row, "")
            .and_then(UserRow::into_user)
            .map_err(|source| RepositoryError::Scan {
                operation,
                table: TABLE,
                source,
            })?;
        found = Some(user);
    }
    Ok(found)
}

/// Commit on `Ok`, roll back on `Err`. Neither is raced against cancellation,
/// so the transaction is always resolved before returning.
async fn finish<T>(
    txn: DatabaseTransaction,
    operation: &'static str,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|source| RepositoryError::Commit {
                    operation,
                    table: TABLE,
                    source,
                })?;
            debug!(operation, "transaction committed");
            Ok(value)
        }
        Err(err) => {
            match txn.rollback().await {
                Ok(()) => debug!(operation, error = %err, "transaction rolled back"),
                Err(rollback_err) => {
                    warn!(operation, error = %err, rollback_error = %rollback_err, "rollback failed")
                }
            }
            Err(err)
        }
    }
}

async fn until_cancelled<F: Future>(token: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        () = token.cancelled() => None,
        output = fut => Some(output),
    }
}
