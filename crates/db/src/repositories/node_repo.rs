//! Repository for the `nodes` table.

use std::collections::HashMap;

use mentor_core::tree_import::ResolvedNode;
use mentor_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::node::Node;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, topic_id, parent_id, requires, next, title, description, \
    prompt_sample, is_chat_enabled, level, position_x, position_y, is_completed, \
    created_at, updated_at";

/// Provides operations on knowledge-tree nodes.
///
/// Link columns (`parent_id`, `requires`, `next`) are written once by
/// [`NodeRepo::insert_batch`] and never updated afterwards.
pub struct NodeRepo;

impl NodeRepo {
    /// Bulk-insert resolved nodes for a topic in a single statement.
    ///
    /// Runs on a caller-supplied connection so it can share the topic
    /// insert's transaction. Rows are returned in input order.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        topic_id: DbId,
        nodes: &[ResolvedNode],
    ) -> Result<Vec<Node>, sqlx::Error> {
        if nodes.is_empty() {
            return Ok(vec![]);
        }

        // The whole batch travels as one JSONB array; UNNEST cannot carry the
        // per-row UUID[] columns.
        let query = format!(
            "INSERT INTO nodes \
                (id, topic_id, parent_id, requires, next, title, description, \
                 prompt_sample, is_chat_enabled, level, position_x, position_y) \
             SELECT n.id, $1, n.parent_id, n.requires, n.next, n.title, n.description, \
                    n.prompt_sample, n.is_chat_enabled, n.level, n.position_x, n.position_y \
             FROM jsonb_to_recordset($2::jsonb) AS n( \
                 id UUID, parent_id UUID, requires UUID[], next UUID[], \
                 title TEXT, description TEXT, prompt_sample TEXT, \
                 is_chat_enabled BOOLEAN, level INTEGER, \
                 position_x DOUBLE PRECISION, position_y DOUBLE PRECISION) \
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, Node>(&query)
            .bind(topic_id)
            .bind(Json(nodes))
            .fetch_all(&mut *conn)
            .await?;

        // RETURNING order is unspecified.
        let order: HashMap<DbId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id, index))
            .collect();
        rows.sort_by_key(|row| order.get(&row.id).copied().unwrap_or(usize::MAX));
        Ok(rows)
    }

    /// List all nodes of a topic, shallowest level first, then top-to-bottom
    /// and left-to-right on the canvas.
    pub async fn list_by_topic(pool: &PgPool, topic_id: DbId) -> Result<Vec<Node>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM nodes
             WHERE topic_id = $1
             ORDER BY level ASC, position_y ASC, position_x ASC, id ASC"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(topic_id)
            .fetch_all(pool)
            .await
    }

    /// Find a node by id, scoped to its topic.
    pub async fn find_in_topic(
        pool: &PgPool,
        topic_id: DbId,
        id: DbId,
    ) -> Result<Option<Node>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nodes WHERE id = $1 AND topic_id = $2");
        sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .bind(topic_id)
            .fetch_optional(pool)
            .await
    }

    /// Set a node's completion flag and refresh the topic's
    /// `completed_nodes` counter in the same transaction.
    ///
    /// The topic row is locked first so completions of sibling nodes run
    /// one after another; each recount then sees the previous commit.
    ///
    /// Returns `None` if the node does not belong to the topic.
    pub async fn set_completion(
        pool: &PgPool,
        topic_id: DbId,
        id: DbId,
        is_completed: bool,
    ) -> Result<Option<Node>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT 1 FROM topics WHERE id = $1 FOR UPDATE")
            .bind(topic_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE nodes SET is_completed = $3
             WHERE id = $1 AND topic_id = $2
             RETURNING {COLUMNS}"
        );
        let node = sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .bind(topic_id)
            .bind(is_completed)
            .fetch_optional(&mut *tx)
            .await?;

        if node.is_some() {
            sqlx::query(
                "UPDATE topics SET completed_nodes = (
                    SELECT COUNT(*) FROM nodes WHERE topic_id = $1 AND is_completed
                 )
                 WHERE id = $1",
            )
            .bind(topic_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(node)
    }

    /// Move a node on the canvas. Returns `None` if not found in the topic.
    pub async fn update_position(
        pool: &PgPool,
        topic_id: DbId,
        id: DbId,
        position_x: f64,
        position_y: f64,
    ) -> Result<Option<Node>, sqlx::Error> {
        let query = format!(
            "UPDATE nodes SET position_x = $3, position_y = $4
             WHERE id = $1 AND topic_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Node>(&query)
            .bind(id)
            .bind(topic_id)
            .bind(position_x)
            .bind(position_y)
            .fetch_optional(pool)
            .await
    }
}
