//! Conversion logic between DTOs and domain entities.

use crate::domain::Session;
use crate::infrastructure::dto::websocket::UserInfo;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Session> for UserInfo {
    fn from(session: &Session) -> Self {
        Self {
            name: session.name.as_str().to_string(),
        }
    }
}
