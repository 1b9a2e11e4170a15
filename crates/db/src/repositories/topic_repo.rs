//! Repository for the `topics` table, including tree import.

use mentor_core::tree_import::{resolve_tree, LinkMode, ValidatedImport};
use mentor_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::topic::{CreateTopic, Topic, TopicTree, UpdateTopic};
use crate::repositories::NodeRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, prompt, is_active, \
    total_nodes, completed_nodes, created_at, updated_at";

/// Failure of [`TopicRepo::import_tree`], split by the step that failed.
///
/// Whatever the step, the transaction is rolled back and nothing persists.
#[derive(Debug, thiserror::Error)]
pub enum TreeImportError {
    /// Opening or committing the transaction failed.
    #[error("Tree import transaction failed: {0}")]
    Transaction(#[source] sqlx::Error),

    /// The topic insert failed; no node insert was attempted.
    #[error("Failed to create topic: {0}")]
    Topic(#[source] sqlx::Error),

    /// The node bulk insert failed after the topic was written.
    #[error("Failed to create nodes: {0}")]
    Nodes(#[source] sqlx::Error),
}

impl TreeImportError {
    /// The underlying database error.
    pub fn db_error(&self) -> &sqlx::Error {
        match self {
            Self::Transaction(e) | Self::Topic(e) | Self::Nodes(e) => e,
        }
    }
}

/// Provides CRUD operations for topics. All lookups are scoped to the
/// owning user and exclude inactive (soft-deleted) topics.
pub struct TopicRepo;

impl TopicRepo {
    /// Insert an empty topic, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTopic,
    ) -> Result<Topic, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert(
            &mut *conn,
            user_id,
            &input.title,
            &input.description,
            input.prompt.as_deref(),
            0,
        )
        .await
    }

    /// Persist an imported tree: one topic plus every node of the batch.
    ///
    /// Placeholder ids are resolved after the topic row exists, then all
    /// nodes go in as one bulk insert. Both inserts share a transaction, so
    /// a failed node insert leaves no topic behind.
    pub async fn import_tree(
        pool: &PgPool,
        user_id: DbId,
        batch: &ValidatedImport,
        mode: LinkMode,
    ) -> Result<TopicTree, TreeImportError> {
        let mut tx = pool.begin().await.map_err(TreeImportError::Transaction)?;

        let total_nodes = i32::try_from(batch.nodes.len()).unwrap_or(i32::MAX);
        let topic = Self::insert(
            &mut *tx,
            user_id,
            &batch.title,
            &batch.description,
            batch.prompt.as_deref(),
            total_nodes,
        )
        .await
        .map_err(TreeImportError::Topic)?;

        let resolved = resolve_tree(&batch.nodes, mode);
        if resolved.dropped_references > 0 {
            tracing::debug!(
                topic_id = %topic.id,
                dropped = resolved.dropped_references,
                "Discarded links to unknown placeholder ids"
            );
        }

        let inserted = NodeRepo::insert_batch(&mut *tx, topic.id, &resolved.nodes).await;
        let nodes = match inserted {
            Ok(nodes) => nodes,
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        topic_id = %topic.id,
                        error = %rollback_err,
                        "Rollback after failed node insert did not complete"
                    );
                }
                return Err(TreeImportError::Nodes(err));
            }
        };

        tx.commit().await.map_err(TreeImportError::Transaction)?;

        tracing::info!(
            topic_id = %topic.id,
            user_id = %user_id,
            node_count = nodes.len(),
            link_mode = %mode,
            "Imported topic tree"
        );

        Ok(TopicTree {
            topic,
            nodes,
            dropped_references: resolved.dropped_references,
        })
    }

    /// Find an active topic owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topics WHERE id = $1 AND user_id = $2 AND is_active"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's active topics, most recently created first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Topic>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topics
             WHERE user_id = $1 AND is_active
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a topic. Only non-`None` fields in `input` are applied; an
    /// empty `prompt` clears the stored prompt.
    ///
    /// Returns `None` if no active topic with the given `id` belongs to the user.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateTopic,
    ) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!(
            "UPDATE topics SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                prompt = CASE WHEN $5::text IS NULL THEN prompt ELSE NULLIF($5, '') END
             WHERE id = $1 AND user_id = $2 AND is_active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.prompt)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a topic. Returns `true` if a row was deactivated.
    pub async fn soft_delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE topics SET is_active = FALSE WHERE id = $1 AND user_id = $2 AND is_active",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert(
        conn: &mut PgConnection,
        user_id: DbId,
        title: &str,
        description: &str,
        prompt: Option<&str>,
        total_nodes: i32,
    ) -> Result<Topic, sqlx::Error> {
        let query = format!(
            "INSERT INTO topics (user_id, title, description, prompt, total_nodes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Topic>(&query)
            .bind(user_id)
            .bind(title)
            .bind(description)
            .bind(prompt)
            .bind(total_nodes)
            .fetch_one(&mut *conn)
            .await
    }
}
