//! UserStore implementation for MySqlStorage.

use super::*;

use crate::traits::UserStore;
use async_trait::async_trait;
use questline_core::{NewUser, ProfileUpdate};

#[async_trait]
impl UserStore for MySqlStorage {
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, nickname) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.nickname)
        .execute(&self.pool)
        .await?;
        let id = last_insert_id(&result);
        self.get_user(id)
            .await?
            .ok_or_else(|| StorageError::NotFound { entity: "user", id: id.to_string() })
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_user_by_login(&self, account: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? OR LOWER(email) = LOWER(?) LIMIT 1"
        ))
        .bind(account)
        .bind(account)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER(?) LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn update_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StorageError> {
        sqlx::query(
            "UPDATE users SET
               nickname = COALESCE(?, nickname),
               bio = COALESCE(?, bio),
               avatar_url = COALESCE(?, avatar_url)
             WHERE id = ?",
        )
        .bind(&update.nickname)
        .bind(&update.bio)
        .bind(&update.avatar_url)
        .bind(id)
        .execute(&self.pool)
        .await?;
        self.get_user(id).await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }
        Ok(self.get_user(id).await?.is_some())
    }
}
