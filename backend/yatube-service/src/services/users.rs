//! User registration and credential checks
use sqlx::PgPool;

use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::security::{hash_password, verify_password};
use crate::validators;

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user. Username/email/password formats are checked
    /// first; a duplicate username or email is a conflict.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        if !validators::validate_username(username) {
            return Err(AppError::Validation(
                "username must be 3-32 characters, alphanumeric with - or _".to_string(),
            ));
        }
        if !validators::validate_email(email) {
            return Err(AppError::Validation("invalid email format".to_string()));
        }
        if !validators::validate_password(password) {
            return Err(AppError::Validation(
                "password must be at least 8 characters with a letter and a number".to_string(),
            ));
        }

        let password_hash = hash_password(password)?;

        let user = user_repo::create_user(&self.pool, username, email, &password_hash)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict("username or email already registered".to_string())
                }
                _ => AppError::from(e),
            })?;

        tracing::info!(user_id = %user.id, username, "user registered");

        Ok(user)
    }

    /// Check credentials and return the user.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let user = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Look up a user by username, 404 when unknown.
    pub async fn get_by_username(&self, username: &str) -> Result<User> {
        user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{username}'")))
    }
}
