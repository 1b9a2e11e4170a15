//! Handlers for the `/topics` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use mentor_core::error::CoreError;
use mentor_core::topic::{
    optional_text, require_text, validate_topic_fields, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};
use mentor_core::types::DbId;
use mentor_db::models::topic::{CreateTopic, Topic, TopicTree, UpdateTopic};
use mentor_db::repositories::{NodeRepo, TopicRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::require_topic;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/topics
///
/// Create an empty topic by hand. Nodes only ever arrive through import.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTopic>,
) -> AppResult<(StatusCode, Json<Topic>)> {
    input.validate()?;
    let (title, description) =
        validate_topic_fields(Some(input.title.as_str()), Some(input.description.as_str()))?;
    let normalized = CreateTopic {
        title,
        description,
        prompt: optional_text(input.prompt.as_deref()),
    };

    let topic = TopicRepo::create(&state.pool, user.user_id, &normalized).await?;
    tracing::info!(topic_id = %topic.id, user_id = %user.user_id, "Created topic");
    Ok((StatusCode::CREATED, Json(topic)))
}

/// GET /api/v1/topics
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<Topic>>> {
    let topics = TopicRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(topics))
}

/// GET /api/v1/topics/{id}
///
/// Returns the topic together with all of its nodes.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TopicTree>> {
    let topic = require_topic(&state, &user, id).await?;
    let nodes = NodeRepo::list_by_topic(&state.pool, topic.id).await?;
    Ok(Json(TopicTree {
        topic,
        nodes,
        dropped_references: 0,
    }))
}

/// PUT /api/v1/topics/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTopic>,
) -> AppResult<Json<Topic>> {
    input.validate()?;
    let normalized = UpdateTopic {
        title: input
            .title
            .as_deref()
            .map(|t| require_text("title", Some(t), MAX_TITLE_LENGTH))
            .transpose()?,
        description: input
            .description
            .as_deref()
            .map(|d| require_text("description", Some(d), MAX_DESCRIPTION_LENGTH))
            .transpose()?,
        // Blank clears the prompt, matching `create`, which stores it as NULL.
        prompt: input
            .prompt
            .as_deref()
            .map(|p| optional_text(Some(p)).unwrap_or_default()),
    };

    let topic = TopicRepo::update(&state.pool, id, user.user_id, &normalized)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id,
        }))?;
    Ok(Json(topic))
}

/// DELETE /api/v1/topics/{id}
///
/// Soft delete: the topic is deactivated and disappears from listings.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TopicRepo::soft_delete(&state.pool, id, user.user_id).await?;
    if deleted {
        tracing::info!(topic_id = %id, user_id = %user.user_id, "Deactivated topic");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id,
        }))
    }
}
