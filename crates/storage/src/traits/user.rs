use async_trait::async_trait;
use questline_core::{NewUser, ProfileUpdate, User};

use crate::error::StorageError;

/// Account rows (`users`).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Duplicate` on a taken username, email, or nickname.
    async fn create_user(&self, user: &NewUser) -> Result<User, StorageError>;

    async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError>;

    /// Look up by username or email.
    async fn find_user_by_login(&self, account: &str) -> Result<Option<User>, StorageError>;

    /// Case-insensitive email lookup.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Apply a profile edit. Returns `None` if the user does not exist.
    async fn update_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, StorageError>;

    /// Returns `false` if the user does not exist.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool, StorageError>;
}
