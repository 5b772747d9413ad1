//! Response types (Serialize)

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageCreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: &'static str,
}

impl SuccessResponse {
    pub const fn ok(message: &'static str) -> Self {
        Self { success: true, message }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub url: String,
}
