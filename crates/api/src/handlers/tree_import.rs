//! Handlers for importing generated learning trees.
//!
//! Both endpoints end in the same pipeline: validate the whole batch, then
//! persist topic and nodes in one transaction via
//! [`TopicRepo::import_tree`]. Validation failures return 400 before any
//! write; persistence failures return 500 with the store's message in
//! `details`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use mentor_core::generated::parse_generated_path;
use mentor_core::tree_import::{validate_import, TreeImportRequest};
use mentor_db::models::topic::TopicTree;
use mentor_db::repositories::TopicRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `POST /topics/import/raw`.
///
/// `title`, `description`, and `prompt` are used only when the generated
/// output does not carry them itself.
#[derive(Debug, Deserialize)]
pub struct RawImportRequest {
    pub raw: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub prompt: Option<String>,
}

/// POST /api/v1/topics/import
///
/// Body: `{ title, description, prompt?, tree: [NodeDescriptor, ...] }`.
/// Returns `201 { topic, nodes }`.
pub async fn import(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<TreeImportRequest>,
) -> AppResult<(StatusCode, Json<TopicTree>)> {
    persist(&state, &user, input).await
}

/// POST /api/v1/topics/import/raw
///
/// Accepts the generator's raw text, fenced or not.
pub async fn import_raw(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<RawImportRequest>,
) -> AppResult<(StatusCode, Json<TopicTree>)> {
    let mut request = parse_generated_path(&input.raw)?;
    request.title = request.title.or(input.title);
    request.description = request.description.or(input.description);
    request.prompt = request.prompt.or(input.prompt);

    persist(&state, &user, request).await
}

async fn persist(
    state: &AppState,
    user: &AuthUser,
    request: TreeImportRequest,
) -> AppResult<(StatusCode, Json<TopicTree>)> {
    let batch = validate_import(request, state.config.max_import_nodes)?;
    tracing::debug!(
        user_id = %user.user_id,
        node_count = batch.nodes.len(),
        "Validated tree import"
    );

    let tree =
        TopicRepo::import_tree(&state.pool, user.user_id, &batch, state.config.link_mode).await?;
    Ok((StatusCode::CREATED, Json(tree)))
}
