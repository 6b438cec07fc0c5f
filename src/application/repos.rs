//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{PostRecord, PostSummary};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Field values for a post insert or full replacement.
#[derive(Debug, Clone)]
pub struct PostParams {
    pub slug: String,
    pub title: String,
    pub body_markdown: String,
}

/// Persistent collection of posts keyed by slug.
///
/// `list_summaries` returns posts in creation order; the order is stable
/// within a single call. `remove` reports how many rows went away so the
/// caller can treat deletion of an absent slug as a no-op.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError>;

    async fn insert(&self, params: PostParams) -> Result<PostRecord, RepoError>;

    /// Replace every field of the post currently stored under `slug`,
    /// including possibly the slug itself. Fails with [`RepoError::NotFound`]
    /// when no post is stored under `slug`.
    async fn replace(&self, slug: &str, params: PostParams) -> Result<PostRecord, RepoError>;

    async fn remove(&self, slug: &str) -> Result<u64, RepoError>;
}
