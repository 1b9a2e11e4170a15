//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must join a
//! caller's transaction take `&mut PgConnection` instead.

pub mod node_repo;
pub mod topic_repo;

pub use node_repo::NodeRepo;
pub use topic_repo::{TopicRepo, TreeImportError};
