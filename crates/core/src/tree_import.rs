//! Tree import: validation and placeholder-id resolution for AI-authored
//! learning trees.
//!
//! A generated tree arrives as a flat list of node descriptors. Nodes point
//! at each other through caller-chosen placeholder ids (`temp_id`), either
//! via a single `parent_id` or via `requires` / `next` lists. Before the
//! nodes can be stored, every placeholder is replaced by a freshly
//! allocated UUID.
//!
//! Resolution rules:
//!
//! - A node's placeholder is its `temp_id`, else its `id`, else `node_<index>`.
//! - Repeated placeholders share the first allocation.
//! - A `parent_id` that names no node in the batch turns the node into a root.
//! - `requires` / `next` entries that name no node in the batch are dropped.
//!
//! Nothing in here touches the database; the `db` crate persists the output
//! of [`resolve_tree`] inside a single transaction.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::topic::{
    optional_text, require_text, validate_topic_fields, MAX_DESCRIPTION_LENGTH,
    MAX_PROMPT_LENGTH, MAX_TITLE_LENGTH,
};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default upper bound on the number of nodes accepted in one import.
pub const DEFAULT_MAX_IMPORT_NODES: usize = 500;

/// Level assigned to nodes that do not specify one.
pub const DEFAULT_LEVEL: i32 = 0;

/// Chat is enabled on nodes unless the descriptor says otherwise.
pub const DEFAULT_CHAT_ENABLED: bool = true;

// ---------------------------------------------------------------------------
// Link mode
// ---------------------------------------------------------------------------

/// How nodes in an imported tree are linked to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMode {
    /// Single-parent tree: each node has at most one `parent_id`.
    Tree,
    /// Prerequisite graph: each node carries `requires` and `next` lists.
    #[default]
    Dag,
}

impl LinkMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Dag => "dag",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "dag" => Ok(Self::Dag),
            other => Err(CoreError::Validation(format!(
                "Unknown link mode '{other}', expected 'tree' or 'dag'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A placeholder id as written by the generator.
///
/// Generators are not consistent about quoting, so integers are accepted and
/// stored in their decimal form. Anything else (`null` inside a list, a
/// boolean, an object) becomes the empty placeholder, which names no node:
/// as a node's own id it counts as absent, as a link it is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawPlaceholder")]
pub struct Placeholder(String);

impl Placeholder {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPlaceholder {
    Text(String),
    Number(serde_json::Number),
    Other(serde::de::IgnoredAny),
}

impl From<RawPlaceholder> for Placeholder {
    fn from(raw: RawPlaceholder) -> Self {
        match raw {
            RawPlaceholder::Text(s) => Self(s),
            RawPlaceholder::Number(n) => Self(n.to_string()),
            RawPlaceholder::Other(_) => Self(String::new()),
        }
    }
}

/// Body of a tree import request.
///
/// Every field is optional at the serde level so that missing or mistyped
/// fields surface as validation errors from [`validate_import`] instead of
/// JSON rejections. `topicName` is accepted for `title` because that is the
/// key the learning-path generator emits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeImportRequest {
    #[serde(default, alias = "topicName")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub tree: Option<serde_json::Value>,
}

/// One element of the `tree` array, exactly as supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeDescriptor {
    pub temp_id: Option<Placeholder>,
    pub id: Option<Placeholder>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub prompt_sample: Option<String>,
    pub is_chat_enabled: Option<bool>,
    pub level: Option<i32>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub parent_id: Option<Placeholder>,
    pub requires: Option<Vec<Placeholder>>,
    pub next: Option<Vec<Placeholder>>,
}

impl NodeDescriptor {
    /// The placeholder this descriptor is known by within its batch.
    ///
    /// Empty strings count as absent.
    pub fn placeholder(&self, index: usize) -> String {
        [&self.temp_id, &self.id]
            .into_iter()
            .flatten()
            .map(Placeholder::as_str)
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("node_{index}"))
    }
}

// ---------------------------------------------------------------------------
// Validated types
// ---------------------------------------------------------------------------

/// A node descriptor that passed validation, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportNode {
    pub placeholder: String,
    pub title: String,
    pub description: String,
    pub prompt_sample: Option<String>,
    pub is_chat_enabled: bool,
    pub level: i32,
    pub position_x: f64,
    pub position_y: f64,
    pub parent: Option<String>,
    pub requires: Vec<String>,
    pub next: Vec<String>,
}

impl ImportNode {
    /// Validate one descriptor. `index` is its position in the `tree` array.
    pub fn from_descriptor(index: usize, node: NodeDescriptor) -> Result<Self, CoreError> {
        let placeholder = node.placeholder(index);
        let title = require_text(
            &format!("tree[{index}].title"),
            node.title.as_deref(),
            MAX_TITLE_LENGTH,
        )?;
        let description = require_text(
            &format!("tree[{index}].description"),
            node.description.as_deref(),
            MAX_DESCRIPTION_LENGTH,
        )?;
        let prompt_sample = optional_text(node.prompt_sample.as_deref());
        if let Some(len) = prompt_sample.as_ref().map(|s| s.chars().count()) {
            if len > MAX_PROMPT_LENGTH {
                return Err(CoreError::Validation(format!(
                    "tree[{index}].prompt_sample must not exceed {MAX_PROMPT_LENGTH} characters, got {len}"
                )));
            }
        }

        let into_strings = |refs: Option<Vec<Placeholder>>| -> Vec<String> {
            refs.unwrap_or_default().into_iter().map(|p| p.0).collect()
        };

        Ok(Self {
            placeholder,
            title,
            description,
            prompt_sample,
            is_chat_enabled: node.is_chat_enabled.unwrap_or(DEFAULT_CHAT_ENABLED),
            level: node.level.unwrap_or(DEFAULT_LEVEL),
            position_x: node.position_x.unwrap_or(0.0),
            position_y: node.position_y.unwrap_or(0.0),
            parent: node.parent_id.map(|p| p.0),
            requires: into_strings(node.requires),
            next: into_strings(node.next),
        })
    }
}

/// A whole import batch that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedImport {
    pub title: String,
    pub description: String,
    pub prompt: Option<String>,
    pub nodes: Vec<ImportNode>,
}

/// Validate an import request before anything is written.
///
/// Every node is checked up front; one invalid node rejects the whole batch.
/// Repeated placeholders are rejected as well, since two rows sharing one
/// durable id cannot both be stored.
pub fn validate_import(
    request: TreeImportRequest,
    max_nodes: usize,
) -> Result<ValidatedImport, CoreError> {
    let (title, description) =
        validate_topic_fields(request.title.as_deref(), request.description.as_deref())?;

    let prompt = optional_text(request.prompt.as_deref());
    if let Some(len) = prompt.as_ref().map(|s| s.chars().count()) {
        if len > MAX_PROMPT_LENGTH {
            return Err(CoreError::Validation(format!(
                "prompt must not exceed {MAX_PROMPT_LENGTH} characters, got {len}"
            )));
        }
    }

    let items = match request.tree {
        None | Some(serde_json::Value::Null) => {
            return Err(CoreError::Validation("tree is required".to_string()))
        }
        Some(serde_json::Value::Array(items)) => items,
        Some(_) => return Err(CoreError::Validation("tree must be an array".to_string())),
    };
    if items.is_empty() {
        return Err(CoreError::Validation(
            "tree must contain at least one node".to_string(),
        ));
    }
    if items.len() > max_nodes {
        return Err(CoreError::Validation(format!(
            "tree must not contain more than {max_nodes} nodes, got {}",
            items.len()
        )));
    }

    let mut nodes = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let descriptor: NodeDescriptor = serde_json::from_value(item).map_err(|e| {
            CoreError::Validation(format!("tree[{index}] is not a valid node: {e}"))
        })?;
        nodes.push(ImportNode::from_descriptor(index, descriptor)?);
    }
    reject_repeated_placeholders(&nodes)?;

    Ok(ValidatedImport {
        title,
        description,
        prompt,
        nodes,
    })
}

fn reject_repeated_placeholders(nodes: &[ImportNode]) -> Result<(), CoreError> {
    let mut first_seen: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if let Some(first) = first_seen.insert(node.placeholder.as_str(), index) {
            return Err(CoreError::Validation(format!(
                "tree[{index}] reuses placeholder id '{}' already used by tree[{first}]",
                node.placeholder
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// A node row ready to be inserted. All links are durable ids from the
/// same batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNode {
    pub id: DbId,
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
}

/// Output of [`resolve_tree`].
#[derive(Debug, Clone)]
pub struct ResolvedTree {
    /// Placeholder to durable id. Request-scoped; never persisted.
    pub id_map: HashMap<String, DbId>,
    /// One row per input node, in input order.
    pub nodes: Vec<ResolvedNode>,
    /// Number of references that named no node in the batch.
    pub dropped_references: usize,
}

impl ResolvedTree {
    /// Durable id allocated for `placeholder`, if any node used it.
    pub fn id_of(&self, placeholder: &str) -> Option<DbId> {
        self.id_map.get(placeholder).copied()
    }
}

/// Allocate one durable id per distinct placeholder.
///
/// The first occurrence of a placeholder allocates; later occurrences reuse
/// that id.
pub fn allocate_ids(nodes: &[ImportNode]) -> HashMap<String, DbId> {
    let mut id_map = HashMap::with_capacity(nodes.len());
    for node in nodes {
        id_map
            .entry(node.placeholder.clone())
            .or_insert_with(Uuid::new_v4);
    }
    id_map
}

/// Rewrite every placeholder in `nodes` into a durable id.
///
/// In [`LinkMode::Tree`] only `parent` is resolved and the lists come out
/// empty. In [`LinkMode::Dag`] only `requires` / `next` are resolved and
/// `parent_id` is always `None`.
pub fn resolve_tree(nodes: &[ImportNode], mode: LinkMode) -> ResolvedTree {
    let id_map = allocate_ids(nodes);
    let mut dropped_references = 0;
    let mut resolved = Vec::with_capacity(nodes.len());

    for node in nodes {
        let id = id_map[&node.placeholder];

        let (parent_id, requires, next) = match mode {
            LinkMode::Tree => {
                let parent_id = node.parent.as_ref().and_then(|p| {
                    let found = id_map.get(p).copied();
                    if found.is_none() {
                        dropped_references += 1;
                    }
                    found
                });
                (parent_id, Vec::new(), Vec::new())
            }
            LinkMode::Dag => (
                None,
                resolve_refs(&node.requires, &id_map, &mut dropped_references),
                resolve_refs(&node.next, &id_map, &mut dropped_references),
            ),
        };

        resolved.push(ResolvedNode {
            id,
            parent_id,
            requires,
            next,
            title: node.title.clone(),
            description: node.description.clone(),
            prompt_sample: node.prompt_sample.clone(),
            is_chat_enabled: node.is_chat_enabled,
            level: node.level,
            position_x: node.position_x,
            position_y: node.position_y,
        });
    }

    ResolvedTree {
        id_map,
        nodes: resolved,
        dropped_references,
    }
}

fn resolve_refs(refs: &[String], id_map: &HashMap<String, DbId>, dropped: &mut usize) -> Vec<DbId> {
    let resolved: Vec<DbId> = refs
        .iter()
        .filter_map(|r| id_map.get(r).copied())
        .collect();
    *dropped += refs.len() - resolved.len();
    resolved
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
