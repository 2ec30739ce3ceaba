use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, never exposed
    pub created_at: OffsetDateTime,
}

/// Failure modes of [`User::create`]. Two concurrent registrations for the
/// same email race on the `uq_users_email` constraint; the loser surfaces
/// here as `DuplicateEmail` with nothing persisted.
#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("email ({email}) already exists")]
    DuplicateEmail { email: String },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        // PostgreSQL unique constraint violation: error code 23505
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with hashed password. The single-statement INSERT
    /// leaves no partial row behind when the unique constraint fires.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CreateUserError::DuplicateEmail {
                    email: email.to_string(),
                }
            } else {
                CreateUserError::Database(e)
            }
        })?;
        Ok(user)
    }
}
