//! Topic entity model and DTOs.

use mentor_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::node::Node;

/// A topic row from the `topics` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Topic {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub prompt: Option<String>,
    pub is_active: bool,
    pub total_nodes: i32,
    pub completed_nodes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an empty topic by hand.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTopic {
    #[validate(length(max = 200))]
    pub title: String,
    #[validate(length(max = 10000))]
    pub description: String,
    #[validate(length(max = 4000))]
    pub prompt: Option<String>,
}

/// DTO for updating a topic. All fields are optional; link structure of the
/// topic's nodes is not editable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTopic {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000))]
    pub description: Option<String>,
    #[validate(length(max = 4000))]
    pub prompt: Option<String>,
}

/// A topic together with all of its nodes.
#[derive(Debug, Clone, Serialize)]
pub struct TopicTree {
    pub topic: Topic,
    pub nodes: Vec<Node>,
    /// Links that named no node in the imported batch and were discarded.
    #[serde(skip_serializing)]
    pub dropped_references: usize,
}
