//! Authentication primitives.
//!
//! - [`jwt`] -- verification of the HS256 access tokens issued by the
//!   identity provider, plus token minting for local tooling and tests.

pub mod jwt;
