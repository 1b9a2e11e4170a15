pub mod health;
pub mod topic;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy (all routes require a Bearer token):
///
/// ```text
/// /topics                                       list, create
/// /topics/import                                tree import (POST)
/// /topics/import/raw                            raw generator output import (POST)
/// /topics/{id}                                  get (with nodes), update, soft delete
/// /topics/{id}/nodes                            list nodes
/// /topics/{id}/nodes/{node_id}/completion       set completion (PUT)
/// /topics/{id}/nodes/{node_id}/position         move on canvas (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/topics", topic::router())
}
