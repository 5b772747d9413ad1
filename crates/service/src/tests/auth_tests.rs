use crate::auth::{LoginRequest, RegisterUser, UpdateProfile};
use crate::error::ServiceError;

use super::{auth_service, memory_storage};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn register(username: &str, email: &str) -> RegisterUser {
    RegisterUser {
        username: Some(username.to_owned()),
        email: Some(email.to_owned()),
        password: Some("hunter22".to_owned()),
        nickname: None,
    }
}

fn login(account: &str, password: &str) -> LoginRequest {
    LoginRequest { account: Some(account.to_owned()), password: Some(password.to_owned()) }
}

#[tokio::test]
async fn test_register_login_me() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, _) = auth_service(&memory_storage(), dir.path());

    let user = auth.register(register("aria", "aria@example.com")).await.unwrap();
    let session = auth.login(login("aria@example.com", "hunter22")).await.unwrap();
    let claims = auth.authenticate(&session.token).unwrap();

    assert_eq!(claims.sub, user.id);
    assert_eq!(auth.me(claims.sub).await.unwrap().username, "aria");
}

#[tokio::test]
async fn test_register_validation_and_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, _) = auth_service(&memory_storage(), dir.path());

    let short = RegisterUser { password: Some("123".to_owned()), ..register("a", "a@example.com") };
    assert!(matches!(auth.register(short).await, Err(ServiceError::InvalidInput(_))));
    let bad_email = register("a", "not-an-email");
    assert!(matches!(auth.register(bad_email).await, Err(ServiceError::InvalidInput(_))));

    auth.register(register("aria", "aria@example.com")).await.unwrap();
    let err = auth.register(register("aria", "other@example.com")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("username")));
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, _) = auth_service(&memory_storage(), dir.path());
    auth.register(register("aria", "aria@example.com")).await.unwrap();

    assert!(matches!(auth.login(login("aria", "wrong-one")).await, Err(ServiceError::Unauthorized(_))));
    assert!(matches!(auth.login(login("nobody", "hunter22")).await, Err(ServiceError::Unauthorized(_))));
    assert!(matches!(auth.authenticate("garbage"), Err(ServiceError::Unauthorized(_))));
}

#[tokio::test]
async fn test_profile_nickname_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, _) = auth_service(&memory_storage(), dir.path());
    let aria = auth.register(register("aria", "aria@example.com")).await.unwrap();
    let bran = auth.register(register("bran", "bran@example.com")).await.unwrap();

    let nick = |n: &str| UpdateProfile { nickname: Some(n.to_owned()), ..UpdateProfile::default() };
    auth.update_profile(aria.id, nick("Songbird")).await.unwrap();
    let err = auth.update_profile(bran.id, nick("Songbird")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("nickname")));
}

#[tokio::test]
async fn test_avatar_upload_validation() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, _) = auth_service(&memory_storage(), dir.path());
    let user = auth.register(register("aria", "aria@example.com")).await.unwrap();

    let err = auth.upload_avatar(user.id, Some("text/plain"), b"hello").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    let err = auth.upload_avatar(user.id, Some("image/png"), b"%PDF-1.7 pretending").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    let oversized = vec![0_u8; questline_core::MAX_AVATAR_BYTES + 1];
    let err = auth.upload_avatar(user.id, Some("image/png"), &oversized).await.unwrap_err();
    assert!(matches!(err, ServiceError::PayloadTooLarge(_)));

    let updated = auth.upload_avatar(user.id, Some("image/png"), PNG_HEADER).await.unwrap();
    let url = updated.avatar_url.unwrap();
    assert!(url.starts_with("/uploads/avatars/"));
    let file_name = url.rsplit('/').next().unwrap();
    assert!(dir.path().join("avatars").join(file_name).exists());
}

#[tokio::test]
async fn test_password_reset_flow() {
    let dir = tempfile::tempdir().unwrap();
    let (auth, mailer) = auth_service(&memory_storage(), dir.path());
    auth.register(register("aria", "aria@example.com")).await.unwrap();

    let err = auth.forgot_password(Some("ghost@example.com")).await.unwrap_err();
    assert!(err.is_not_found());

    auth.forgot_password(Some("Aria@Example.com")).await.unwrap();
    let code = mailer.last_code().unwrap();
    auth.verify_code(Some("aria@example.com"), Some(&code)).unwrap();
    assert!(auth.verify_code(Some("aria@example.com"), Some("000000x")).is_err());

    auth.reset_password(Some("aria@example.com"), Some(&code), Some("new-secret")).await.unwrap();
    let err = auth
        .reset_password(Some("aria@example.com"), Some(&code), Some("again-secret"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)), "codes are single-use");

    assert!(auth.login(login("aria", "hunter22")).await.is_err());
    assert!(auth.login(login("aria", "new-secret")).await.is_ok());
}
