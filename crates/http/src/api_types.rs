//! Request bodies not owned by the service layer.

use questline_core::ProgressUpdate;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub chapter: Option<String>,
    pub scene: Option<String>,
    pub state: Option<Value>,
}

impl From<ProgressRequest> for ProgressUpdate {
    fn from(req: ProgressRequest) -> Self {
        Self { chapter: req.chapter, scene: req.scene, state: req.state }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckpointRequest {
    pub label: Option<String>,
    pub state: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub code: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRequest {
    pub game_id: Option<String>,
    pub genre: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: Option<String>,
}
