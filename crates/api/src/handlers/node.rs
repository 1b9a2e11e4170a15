//! Handlers for nodes nested under `/topics/{id}/nodes`.
//!
//! Link structure is fixed at import time; only completion and canvas
//! position can change.

use axum::extract::{Path, State};
use axum::Json;
use mentor_core::error::CoreError;
use mentor_core::types::DbId;
use mentor_db::models::node::{Node, UpdateNodeCompletion, UpdateNodePosition};
use mentor_db::repositories::NodeRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::require_topic;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/topics/{id}/nodes
pub async fn list_by_topic(
    State(state): State<AppState>,
    user: AuthUser,
    Path(topic_id): Path<DbId>,
) -> AppResult<Json<Vec<Node>>> {
    require_topic(&state, &user, topic_id).await?;
    let nodes = NodeRepo::list_by_topic(&state.pool, topic_id).await?;
    Ok(Json(nodes))
}

/// PUT /api/v1/topics/{id}/nodes/{node_id}/completion
///
/// Also refreshes the topic's `completed_nodes` counter.
pub async fn set_completion(
    State(state): State<AppState>,
    user: AuthUser,
    Path((topic_id, node_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateNodeCompletion>,
) -> AppResult<Json<Node>> {
    require_topic(&state, &user, topic_id).await?;
    let node = NodeRepo::set_completion(&state.pool, topic_id, node_id, input.is_completed)
        .await?
        .ok_or(node_not_found(node_id))?;
    Ok(Json(node))
}

/// PUT /api/v1/topics/{id}/nodes/{node_id}/position
pub async fn update_position(
    State(state): State<AppState>,
    user: AuthUser,
    Path((topic_id, node_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateNodePosition>,
) -> AppResult<Json<Node>> {
    require_topic(&state, &user, topic_id).await?;
    let node = NodeRepo::update_position(
        &state.pool,
        topic_id,
        node_id,
        input.position_x,
        input.position_y,
    )
    .await?
    .ok_or(node_not_found(node_id))?;
    Ok(Json(node))
}

fn node_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Node", id })
}
