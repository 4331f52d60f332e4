//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Summary information for a room (used in room list responses)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room: String,
    pub users: Vec<String>,
}
