pub mod node;
pub mod topic;
pub mod tree_import;

use mentor_core::error::CoreError;
use mentor_core::types::DbId;
use mentor_db::models::topic::Topic;
use mentor_db::repositories::TopicRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load an active topic owned by `user`, or 404.
///
/// Topics owned by someone else are reported as missing, not forbidden.
pub(crate) async fn require_topic(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<Topic> {
    TopicRepo::find_for_user(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Topic",
            id,
        }))
}
