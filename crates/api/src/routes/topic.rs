//! Route definitions for the `/topics` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{node, topic, tree_import};
use crate::state::AppState;

/// Routes mounted at `/topics`.
///
/// ```text
/// GET    /                                   -> list
/// POST   /                                   -> create
/// POST   /import                             -> import
/// POST   /import/raw                         -> import_raw
/// GET    /{id}                               -> get_by_id
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
///
/// GET    /{id}/nodes                         -> list_by_topic
/// PUT    /{id}/nodes/{node_id}/completion    -> set_completion
/// PUT    /{id}/nodes/{node_id}/position      -> update_position
/// ```
pub fn router() -> Router<AppState> {
    let node_routes = Router::new()
        .route("/", get(node::list_by_topic))
        .route("/{node_id}/completion", put(node::set_completion))
        .route("/{node_id}/position", put(node::update_position));

    Router::new()
        .route("/", get(topic::list).post(topic::create))
        .route("/import", post(tree_import::import))
        .route("/import/raw", post(tree_import::import_raw))
        .route(
            "/{id}",
            get(topic::get_by_id)
                .put(topic::update)
                .delete(topic::delete),
        )
        .nest("/{id}/nodes", node_routes)
}
