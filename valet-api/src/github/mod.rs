//! GitHub API access for preview environments.
//!
//! The [`GithubClient`] trait abstracts the two GitHub operations the server
//! performs, reading pull request metadata and dispatching preview workflows,
//! so route handlers can be exercised against mock implementations.

mod base;
pub mod http;

pub use base::*;
