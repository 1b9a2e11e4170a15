//! Domain logic for the learning-topic service.
//!
//! Everything here is pure: no database, no async, no I/O. The `db` and
//! `api` crates build on these types.

pub mod error;
pub mod generated;
pub mod topic;
pub mod tree_import;
pub mod types;
