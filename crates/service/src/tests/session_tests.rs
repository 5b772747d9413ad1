use std::sync::Arc;

use questline_core::{ProgressUpdate, SessionStatus};
use serde_json::json;

use super::{memory_storage, session_service, start};
use crate::error::ServiceError;
use crate::session_service::StartSession;

#[tokio::test]
async fn test_start_creates_game_character_and_session() {
    let storage = memory_storage();
    let sessions = session_service(&storage);

    let session = sessions.start(start(Some("s1"))).await.unwrap();
    assert_eq!(session.session_id, "s1");
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.character_id, "char-1");
}

#[tokio::test]
async fn test_start_generates_uuid_when_id_missing() {
    let storage = memory_storage();
    let sessions = session_service(&storage);

    let session = sessions.start(start(Some("  "))).await.unwrap();
    assert!(uuid::Uuid::parse_str(&session.session_id).is_ok());
}

#[tokio::test]
async fn test_restart_reactivates_instead_of_duplicating() {
    let storage = memory_storage();
    let sessions = session_service(&storage);

    sessions.start(start(Some("s1"))).await.unwrap();
    let ended = sessions.end(Some("s1")).await.unwrap();
    assert_eq!(ended.status, SessionStatus::Ended);
    assert!(ended.ended_at.is_some());

    let again = sessions.start(start(Some("s1"))).await.unwrap();
    assert_eq!(again.status, SessionStatus::Active);
    assert!(again.ended_at.is_none());
    assert_eq!(sessions.list_for_user(Some("user-1"), None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_start_requires_all_three_ids() {
    let storage = memory_storage();
    let sessions = session_service(&storage);

    for input in [
        StartSession { game_id: None, ..start(None) },
        StartSession { user_id: Some(String::new()), ..start(None) },
        StartSession { character_id: None, ..start(None) },
    ] {
        assert!(matches!(sessions.start(input).await, Err(ServiceError::InvalidInput(_))));
    }
}

#[tokio::test]
async fn test_end_unknown_session_is_not_found() {
    let storage = memory_storage();
    let sessions = session_service(&storage);

    assert!(sessions.end(Some("ghost")).await.unwrap_err().is_not_found());
    assert!(matches!(sessions.end(None).await, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_progress_and_checkpoints_require_session() {
    let storage = memory_storage();
    let sessions = session_service(&storage);

    let err = sessions.update_progress("ghost", &ProgressUpdate::default()).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(sessions.list_checkpoints("ghost").await.unwrap_err().is_not_found());
    assert!(sessions.get_progress("ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_progress_and_checkpoints() {
    let storage = memory_storage();
    let sessions = session_service(&storage);
    sessions.start(start(Some("s1"))).await.unwrap();

    let update = ProgressUpdate {
        chapter: Some("2".to_owned()),
        state: Some(json!({"gold": 12})),
        ..ProgressUpdate::default()
    };
    sessions.update_progress("s1", &update).await.unwrap();
    assert_eq!(sessions.get_progress("s1").await.unwrap().chapter.as_deref(), Some("2"));

    let err = sessions.add_checkpoint("s1", Some(" "), None).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let checkpoint = sessions.add_checkpoint("s1", Some("boss door"), None).await.unwrap();
    assert_eq!(checkpoint.state, json!({}));
    assert_eq!(sessions.list_checkpoints("s1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_start_existing_character_under_new_game_creates_game() {
    let storage = memory_storage();
    let sessions = session_service(&storage);
    sessions.start(start(Some("s1"))).await.unwrap();

    let input = StartSession { game_id: Some("game-2".to_owned()), ..start(Some("s2")) };
    let session = sessions.start(input).await.unwrap();
    assert_eq!(session.game_id, "game-2");
    assert_eq!(session.character_id, "char-1");

    let characters = crate::CharacterService::new(Arc::clone(&storage));
    assert!(characters.get_game("game-2").await.unwrap().is_some());
}

#[tokio::test]
async fn test_restart_with_different_ids_keeps_stored_ids() {
    let storage = memory_storage();
    let sessions = session_service(&storage);
    sessions.start(start(Some("s1"))).await.unwrap();

    let input = StartSession {
        game_id: Some("game-9".to_owned()),
        character_id: Some("char-9".to_owned()),
        ..start(Some("s1"))
    };
    let session = sessions.start(input).await.unwrap();
    assert_eq!(session.game_id, "game-1");
    assert_eq!(session.character_id, "char-1");
}
