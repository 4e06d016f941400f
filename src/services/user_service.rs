use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::database::models::{NewUser, PasswordResetToken, User, UserChanges};
use crate::database::DatabaseError;
use crate::types::UserRole;

const USER_COLUMNS: &str = "id, clerk_user_id, email, first_name, last_name, phone_number, role, \
     is_active, is_approved, profile_complete, hashed_password, created_at, updated_at";

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    /// Like `find` but absence is an error
    pub async fn get(&self, id: i64) -> Result<User, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(email.trim()).fetch_optional(&self.pool).await?)
    }

    pub async fn find_by_clerk_id(&self, clerk_user_id: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE clerk_user_id = $1", USER_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(clerk_user_id).fetch_optional(&self.pool).await?)
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool, DatabaseError> {
        let (taken,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email.trim())
            .fetch_one(&self.pool)
            .await?;
        Ok(taken)
    }

    pub async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (clerk_user_id, email, first_name, last_name, phone_number, role, hashed_password, is_approved) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            USER_COLUMNS
        );
        let created: User = sqlx::query_as(&sql)
            .bind(&user.clerk_user_id)
            .bind(user.email.trim())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone_number)
            .bind(user.role.as_str())
            .bind(&user.hashed_password)
            .bind(user.is_approved)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created {} user {} ({})", created.role, created.id, created.email);
        Ok(created)
    }

    pub async fn update(&self, id: i64, changes: &UserChanges) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET \
                 email = COALESCE($2, email), \
                 first_name = COALESCE($3, first_name), \
                 last_name = COALESCE($4, last_name), \
                 phone_number = COALESCE($5, phone_number), \
                 role = COALESCE($6, role), \
                 is_active = COALESCE($7, is_active), \
                 is_approved = COALESCE($8, is_approved), \
                 profile_complete = COALESCE($9, profile_complete), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as(&sql)
            .bind(id)
            .bind(&changes.email)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.phone_number)
            .bind(changes.role.map(|r| r.as_str()))
            .bind(changes.is_active)
            .bind(changes.is_approved)
            .bind(changes.profile_complete)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    pub async fn set_approved(&self, id: i64, approved: bool) -> Result<User, DatabaseError> {
        self.update(id, &UserChanges { is_approved: Some(approved), ..Default::default() }).await
    }

    pub async fn set_active(&self, id: i64, active: bool) -> Result<User, DatabaseError> {
        self.update(id, &UserChanges { is_active: Some(active), ..Default::default() }).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        Ok(sqlx::query_as(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn list_by_role(&self, role: UserRole) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE UPPER(role) = $1 ORDER BY id", USER_COLUMNS);
        Ok(sqlx::query_as(&sql).bind(role.as_str()).fetch_all(&self.pool).await?)
    }

    // Password reset tokens

    /// Replace any live tokens for the user with a fresh one.
    pub async fn issue_reset_token(
        &self,
        user_id: i64,
        token: &str,
        ttl_minutes: i64,
    ) -> Result<PasswordResetToken, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1 AND used = FALSE AND expires_at > NOW()")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let issued: PasswordResetToken = sqlx::query_as(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at) VALUES ($1, $2, $3) \
             RETURNING id, user_id, token, expires_at, used, created_at",
        )
        .bind(user_id)
        .bind(token)
        .bind(Utc::now() + Duration::minutes(ttl_minutes))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(issued)
    }

    pub async fn revoke_reset_token(&self, token_id: i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE id = $1")
            .bind(token_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn find_reset_token(&self, token: &str) -> Result<Option<PasswordResetToken>, DatabaseError> {
        Ok(sqlx::query_as(
            "SELECT id, user_id, token, expires_at, used, created_at FROM password_reset_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?)
    }

    /// Claim the token and set the new hash in one transaction.
    ///
    /// Returns `false` when the token was already spent or has expired by the
    /// time the claim runs, so concurrent redemptions cannot both succeed.
    pub async fn redeem_reset_token(&self, token: &PasswordResetToken, new_hash: &str) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE password_reset_tokens SET used = TRUE WHERE id = $1 AND used = FALSE AND expires_at > NOW()",
        )
        .bind(token.id)
        .execute(&mut *tx)
        .await?;
        if claimed.rows_affected() == 0 {
            return Ok(false);
        }

        let updated = sqlx::query("UPDATE users SET hashed_password = $2, updated_at = NOW() WHERE id = $1")
            .bind(token.user_id)
            .bind(new_hash)
            .execute(&mut *tx)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }

        tx.commit().await?;
        tracing::info!("Password reset completed for user {}", token.user_id);
        Ok(true)
    }
}
