use std::path::PathBuf;
use std::sync::Arc;

use questline_core::{
    MAX_AVATAR_BYTES, MIN_PASSWORD_LEN, NewUser, ProfileUpdate, PublicUser, User,
};
use questline_storage::traits::UserStore;
use questline_storage::{StorageBackend, StorageError};
use serde::{Deserialize, Serialize};

use super::avatar::sniff_image;
use super::mailer::Mailer;
use super::password::{blocking, hash_password, verify_password};
use super::reset_codes::ResetCodeCache;
use super::token::{Claims, TokenSigner};
use crate::error::ServiceError;
use crate::{non_empty, required};

/// Public path prefix under which uploaded files are served.
const UPLOADS_URL_PREFIX: &str = "/uploads";
const AVATAR_SUBDIR: &str = "avatars";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub account: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: PublicUser,
}

pub struct AuthService {
    storage: Arc<StorageBackend>,
    signer: TokenSigner,
    reset_codes: Arc<ResetCodeCache>,
    mailer: Arc<dyn Mailer>,
    upload_dir: PathBuf,
}

impl AuthService {
    #[must_use]
    pub fn new(
        storage: Arc<StorageBackend>,
        signer: TokenSigner,
        reset_codes: Arc<ResetCodeCache>,
        mailer: Arc<dyn Mailer>,
        upload_dir: PathBuf,
    ) -> Self {
        Self { storage, signer, reset_codes, mailer, upload_dir }
    }

    #[must_use]
    pub fn reset_codes(&self) -> &Arc<ResetCodeCache> {
        &self.reset_codes
    }

    pub async fn register(&self, input: RegisterUser) -> Result<PublicUser, ServiceError> {
        let username = required(input.username.as_deref(), "username")?.to_owned();
        let email = required(input.email.as_deref(), "email")?.to_owned();
        let password = input.password.unwrap_or_default();
        if !is_plausible_email(&email) {
            return Err(ServiceError::InvalidInput("email is not valid".to_owned()));
        }
        validate_password(&password)?;

        let password_hash = blocking(move || hash_password(&password)).await??;
        let new_user = NewUser {
            username,
            email,
            password_hash,
            nickname: non_empty(input.nickname.as_deref()).map(str::to_owned),
        };
        let user = self.storage.create_user(&new_user).await.map_err(taken)?;
        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(user.into())
    }

    pub async fn login(&self, input: LoginRequest) -> Result<LoginResult, ServiceError> {
        let bad_credentials = || ServiceError::Unauthorized("invalid account or password".to_owned());
        let account = required(input.account.as_deref(), "account")?;
        let password = input.password.unwrap_or_default();

        let Some(user) = self.storage.find_user_by_login(account).await? else {
            tracing::debug!(account = %account, "login for unknown account");
            return Err(bad_credentials());
        };
        let stored_hash = user.password_hash.clone();
        if !blocking(move || verify_password(&password, &stored_hash)).await? {
            tracing::debug!(user_id = user.id, "login with wrong password");
            return Err(bad_credentials());
        }

        let token = self.signer.issue(user.id, &user.username)?;
        Ok(LoginResult { token, user: user.into() })
    }

    /// Resolve a bearer token into its claims.
    pub fn authenticate(&self, token: &str) -> Result<Claims, ServiceError> {
        self.signer.verify(token)
    }

    pub async fn me(&self, user_id: i64) -> Result<PublicUser, ServiceError> {
        Ok(self.load_user(user_id).await?.into())
    }

    pub async fn update_profile(
        &self,
        user_id: i64,
        input: UpdateProfile,
    ) -> Result<PublicUser, ServiceError> {
        let update = ProfileUpdate {
            nickname: non_empty(input.nickname.as_deref()).map(str::to_owned),
            bio: input.bio,
            avatar_url: non_empty(input.avatar_url.as_deref()).map(str::to_owned),
        };
        self.apply_profile(user_id, &update).await
    }

    /// Validate and store an uploaded avatar, then point the profile at it.
    pub async fn upload_avatar(
        &self,
        user_id: i64,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<PublicUser, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::InvalidInput("avatar file is required".to_owned()));
        }
        if bytes.len() > MAX_AVATAR_BYTES {
            return Err(ServiceError::PayloadTooLarge(format!(
                "avatar exceeds {MAX_AVATAR_BYTES} bytes"
            )));
        }
        if !content_type.is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/")) {
            return Err(ServiceError::InvalidInput("avatar must be an image".to_owned()));
        }
        let Some(kind) = sniff_image(bytes) else {
            return Err(ServiceError::InvalidInput(
                "avatar content is not a PNG, JPEG, GIF, or WebP image".to_owned(),
            ));
        };
        self.load_user(user_id).await?;

        let dir = self.upload_dir.join(AVATAR_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;
        let file_name = format!("{user_id}-{}.{}", uuid::Uuid::new_v4().simple(), kind.extension());
        tokio::fs::write(dir.join(&file_name), bytes).await?;
        tracing::info!(user_id, file = %file_name, bytes = bytes.len(), "avatar stored");

        let update = ProfileUpdate {
            avatar_url: Some(format!("{UPLOADS_URL_PREFIX}/{AVATAR_SUBDIR}/{file_name}")),
            ..ProfileUpdate::default()
        };
        self.apply_profile(user_id, &update).await
    }

    /// Issue a reset code for a registered email and hand it to the mailer.
    pub async fn forgot_password(&self, email: Option<&str>) -> Result<(), ServiceError> {
        let email = required(email, "email")?;
        if self.storage.find_user_by_email(email).await?.is_none() {
            return Err(ServiceError::not_found("account with email", email));
        }
        let code = self.reset_codes.issue(email);
        self.mailer.send_reset_code(email, &code).await
    }

    pub fn verify_code(&self, email: Option<&str>, code: Option<&str>) -> Result<(), ServiceError> {
        let email = required(email, "email")?;
        let code = required(code, "code")?;
        if self.reset_codes.verify(email, code) {
            Ok(())
        } else {
            Err(ServiceError::InvalidInput("invalid or expired code".to_owned()))
        }
    }

    pub async fn reset_password(
        &self,
        email: Option<&str>,
        code: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<(), ServiceError> {
        let email = required(email, "email")?;
        let code = required(code, "code")?;
        let new_password = new_password.unwrap_or_default().to_owned();
        validate_password(&new_password)?;

        let Some(user) = self.storage.find_user_by_email(email).await? else {
            return Err(ServiceError::InvalidInput("invalid or expired code".to_owned()));
        };
        if !self.reset_codes.consume(email, code) {
            return Err(ServiceError::InvalidInput("invalid or expired code".to_owned()));
        }

        let password_hash = blocking(move || hash_password(&new_password)).await??;
        if !self.storage.update_password(user.id, &password_hash).await? {
            return Err(ServiceError::not_found("user", user.id));
        }
        tracing::info!(user_id = user.id, "password reset");
        Ok(())
    }

    async fn load_user(&self, user_id: i64) -> Result<User, ServiceError> {
        self.storage.get_user(user_id).await?.ok_or_else(|| ServiceError::not_found("user", user_id))
    }

    async fn apply_profile(
        &self,
        user_id: i64,
        update: &ProfileUpdate,
    ) -> Result<PublicUser, ServiceError> {
        self.storage
            .update_profile(user_id, update)
            .await
            .map_err(taken)?
            .map(PublicUser::from)
            .ok_or_else(|| ServiceError::not_found("user", user_id))
    }
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Unique-key violations on the users table become a 409 naming the field.
fn taken(err: StorageError) -> ServiceError {
    match &err {
        StorageError::Duplicate(detail) if duplicate_key_is(detail, "nickname") => {
            ServiceError::Conflict("nickname already taken".to_owned())
        },
        StorageError::Duplicate(detail) if duplicate_key_is(detail, "email") => {
            ServiceError::Conflict("email already registered".to_owned())
        },
        StorageError::Duplicate(_) => ServiceError::Conflict("username already taken".to_owned()),
        _ => err.into(),
    }
}

/// Match on the key name, not the offending value, which may contain anything.
fn duplicate_key_is(detail: &str, column: &str) -> bool {
    detail.starts_with(&format!("users.{column} "))
        || detail.contains(&format!("uq_users_{column}'"))
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
