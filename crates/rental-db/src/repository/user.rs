//! # User Repository

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use rental_core::User;

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, role, contact, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Case-insensitive lookup (the column is `COLLATE NOCASE`).
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, role, contact, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Inserts or replaces a user keyed by id.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - username taken by another id
    pub async fn upsert(&self, user: &User) -> DbResult<()> {
        upsert_user(&self.pool, user).await
    }

    /// All users, oldest account first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, role, contact, created_at
            FROM users
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn count(&self) -> DbResult<i64> {
        count_users(&self.pool).await
    }
}

pub(crate) async fn count_users<'e, E>(executor: E) -> DbResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// [`UserRepository::upsert`] on any executor, including an open transaction.
pub(crate) async fn upsert_user<'e, E>(executor: E, user: &User) -> DbResult<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    debug!(id = %user.id, username = %user.username, "Saving user");

    sqlx::query(
        r#"
        INSERT INTO users (id, username, role, contact, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            username = excluded.username,
            role = excluded.role,
            contact = excluded.contact
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(user.role)
    .bind(&user.contact)
    .bind(user.created_at)
    .execute(executor)
    .await
    .map_err(|e| DbError::from(e).with_duplicate_value("username", &user.username))?;

    Ok(())
}
