use questline_core::{NewUser, ProfileUpdate};

use super::create_test_storage;
use crate::traits::UserStore;

fn new_user(username: &str, email: &str, nickname: Option<&str>) -> NewUser {
    NewUser {
        username: username.to_owned(),
        email: email.to_owned(),
        password_hash: "hash".to_owned(),
        nickname: nickname.map(str::to_owned),
    }
}

#[tokio::test]
async fn test_username_and_email_are_unique() {
    let storage = create_test_storage();
    storage.create_user(&new_user("aria", "aria@example.com", None)).await.unwrap();

    let err = storage.create_user(&new_user("aria", "other@example.com", None)).await.unwrap_err();
    assert!(err.is_duplicate());
    let err = storage.create_user(&new_user("bran", "ARIA@example.com", None)).await.unwrap_err();
    assert!(err.is_duplicate());
}

#[tokio::test]
async fn test_login_by_username_or_email() {
    let storage = create_test_storage();
    let user = storage.create_user(&new_user("aria", "aria@example.com", None)).await.unwrap();

    assert_eq!(storage.find_user_by_login("aria").await.unwrap().unwrap().id, user.id);
    assert_eq!(storage.find_user_by_login("Aria@Example.com").await.unwrap().unwrap().id, user.id);
    assert!(storage.find_user_by_login("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn test_profile_update_rejects_taken_nickname() {
    let storage = create_test_storage();
    storage.create_user(&new_user("aria", "aria@example.com", Some("Songbird"))).await.unwrap();
    let bran = storage.create_user(&new_user("bran", "bran@example.com", None)).await.unwrap();

    let update = ProfileUpdate { nickname: Some("Songbird".to_owned()), ..ProfileUpdate::default() };
    assert!(storage.update_profile(bran.id, &update).await.unwrap_err().is_duplicate());

    let update = ProfileUpdate { bio: Some("Ranger".to_owned()), ..ProfileUpdate::default() };
    let updated = storage.update_profile(bran.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Ranger"));
    assert!(updated.nickname.is_none());
}

#[tokio::test]
async fn test_update_password() {
    let storage = create_test_storage();
    let user = storage.create_user(&new_user("aria", "aria@example.com", None)).await.unwrap();

    assert!(storage.update_password(user.id, "new-hash").await.unwrap());
    assert_eq!(storage.get_user(user.id).await.unwrap().unwrap().password_hash, "new-hash");
    assert!(!storage.update_password(9999, "x").await.unwrap());
}
