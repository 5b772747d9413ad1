//! Service tests against the in-memory backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use questline_storage::StorageBackend;

use crate::auth::{AuthService, Mailer, ResetCodeCache, TokenSigner};
use crate::character_service::CharacterService;
use crate::error::ServiceError;
use crate::session_service::{SessionService, StartSession};

mod auth_tests;
mod session_tests;

pub fn memory_storage() -> Arc<StorageBackend> {
    Arc::new(StorageBackend::new_memory())
}

pub fn session_service(storage: &Arc<StorageBackend>) -> SessionService {
    SessionService::new(Arc::clone(storage), Arc::new(CharacterService::new(Arc::clone(storage))))
}

pub fn start(session_id: Option<&str>) -> StartSession {
    StartSession {
        session_id: session_id.map(str::to_owned),
        game_id: Some("game-1".to_owned()),
        user_id: Some("user-1".to_owned()),
        character_id: Some("char-1".to_owned()),
    }
}

/// Captures reset codes instead of sending them.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn last_code(&self) -> Option<String> {
        self.sent.lock().ok()?.last().map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_reset_code(&self, email: &str, code: &str) -> Result<(), ServiceError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((email.to_owned(), code.to_owned()));
        }
        Ok(())
    }
}

pub fn auth_service(
    storage: &Arc<StorageBackend>,
    upload_dir: &std::path::Path,
) -> (AuthService, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let service = AuthService::new(
        Arc::clone(storage),
        TokenSigner::new("test-secret", 3600),
        Arc::new(ResetCodeCache::new()),
        Arc::clone(&mailer) as Arc<dyn Mailer>,
        upload_dir.to_path_buf(),
    );
    (service, mailer)
}
