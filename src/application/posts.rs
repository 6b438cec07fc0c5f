//! Post listing, lookup, and admin mutations.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::repos::{PostParams, PostsRepo, RepoError};
use crate::domain::entities::{AdminIdentity, PostRecord, PostSummary};
use crate::domain::slug;

/// Typed form payload for a post create or full replacement. Built once at
/// the HTTP boundary; untyped submissions never reach this layer.
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub title: String,
    pub slug: String,
    pub markdown: String,
}

/// Per-field validation outcome for the editor form. Every field is checked
/// independently so the form can flag all problems in one round trip; `None`
/// means the field passed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.slug.is_none() && self.markdown.is_none()
    }
}

#[derive(Debug, Error)]
pub enum PostError {
    #[error("post fields failed validation")]
    Invalid(FieldErrors),
    #[error("slug `{slug}` is already in use")]
    SlugTaken { slug: String },
    #[error("no post stored under slug `{slug}`")]
    NotFound { slug: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Check all three fields, collecting the full error map rather than
/// stopping at the first failure.
pub fn validate_fields(fields: &PostFields) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if fields.title.trim().is_empty() {
        errors.title = Some("Title is required.".to_string());
    }

    if fields.slug.trim().is_empty() {
        errors.slug = Some("Slug is required.".to_string());
    } else if !slug::is_url_safe(&fields.slug) {
        errors.slug =
            Some("Slug may only contain lowercase letters, digits, and hyphens.".to_string());
    }

    if fields.markdown.trim().is_empty() {
        errors.markdown = Some("Content is required.".to_string());
    }

    errors
}

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostsRepo>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostsRepo>) -> Self {
        Self { repo }
    }

    /// Listing order is creation order and stable within a single call.
    pub async fn list_summaries(&self) -> Result<Vec<PostSummary>, PostError> {
        self.repo.list_summaries().await.map_err(PostError::from)
    }

    /// Absence is not an error here; callers decide whether it is a 404.
    pub async fn get_post(&self, slug: &str) -> Result<Option<PostRecord>, PostError> {
        self.repo.find_by_slug(slug).await.map_err(PostError::from)
    }

    /// Insert a new post. Slug collisions are rejected rather than
    /// overwritten; the unique index backs up the pre-check.
    pub async fn create_post(
        &self,
        actor: &AdminIdentity,
        fields: PostFields,
    ) -> Result<PostRecord, PostError> {
        let errors = validate_fields(&fields);
        if !errors.is_empty() {
            return Err(PostError::Invalid(errors));
        }

        if self.repo.find_by_slug(&fields.slug).await?.is_some() {
            return Err(PostError::SlugTaken { slug: fields.slug });
        }

        let post = self
            .repo
            .insert(params_from(&fields))
            .await
            .map_err(|err| duplicate_to_slug_taken(err, &fields.slug))?;

        info!(
            target: "foglio::posts",
            actor = actor.actor(),
            slug = %post.slug,
            "post created",
        );
        Ok(post)
    }

    /// Replace every field of the post stored under `original_slug`. The
    /// slug itself may change; the post keeps its internal id.
    pub async fn update_post(
        &self,
        actor: &AdminIdentity,
        original_slug: &str,
        fields: PostFields,
    ) -> Result<PostRecord, PostError> {
        let errors = validate_fields(&fields);
        if !errors.is_empty() {
            return Err(PostError::Invalid(errors));
        }

        if self.repo.find_by_slug(original_slug).await?.is_none() {
            return Err(PostError::NotFound {
                slug: original_slug.to_string(),
            });
        }

        if fields.slug != original_slug && self.repo.find_by_slug(&fields.slug).await?.is_some() {
            return Err(PostError::SlugTaken { slug: fields.slug });
        }

        let post = self
            .repo
            .replace(original_slug, params_from(&fields))
            .await
            .map_err(|err| match err {
                RepoError::NotFound => PostError::NotFound {
                    slug: original_slug.to_string(),
                },
                other => duplicate_to_slug_taken(other, &fields.slug),
            })?;

        info!(
            target: "foglio::posts",
            actor = actor.actor(),
            original_slug = original_slug,
            slug = %post.slug,
            "post updated",
        );
        Ok(post)
    }

    /// Deleting an absent slug is a quiet no-op.
    pub async fn delete_post(&self, actor: &AdminIdentity, slug: &str) -> Result<(), PostError> {
        let removed = self.repo.remove(slug).await?;

        info!(
            target: "foglio::posts",
            actor = actor.actor(),
            slug = slug,
            removed = removed,
            "post deleted",
        );
        Ok(())
    }
}

fn params_from(fields: &PostFields) -> PostParams {
    PostParams {
        slug: fields.slug.clone(),
        title: fields.title.clone(),
        body_markdown: fields.markdown.clone(),
    }
}

fn duplicate_to_slug_taken(err: RepoError, slug: &str) -> PostError {
    match err {
        RepoError::Duplicate { .. } => PostError::SlugTaken {
            slug: slug.to_string(),
        },
        other => PostError::Repo(other),
    }
}
