//! Node entity model and DTOs.

use mentor_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A node row from the `nodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Node {
    pub id: DbId,
    pub topic_id: DbId,
    pub parent_id: Option<DbId>,
    pub requires: Vec<DbId>,
    pub next: Vec<DbId>,
    pub title: String,
    pub description: String,
    pub prompt_sample: Option<String>,
    pub is_chat_enabled: bool,
    pub level: i32,
    pub position_x: f64,
    pub position_y: f64,
    pub is_completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for toggling a node's completion flag.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNodeCompletion {
    pub is_completed: bool,
}

/// DTO for moving a node on the canvas.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNodePosition {
    pub position_x: f64,
    pub position_y: f64,
}
