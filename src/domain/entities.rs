//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored blog post. The slug is the public lookup key; `id` is the
/// internal identity and never changes, even when the slug is edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub body_markdown: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Listing projection: everything the index pages need, nothing more.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
}

/// A verified administrator for the duration of one request.
///
/// Carries no credentials; the auth gate constructs one only after the
/// presented token has been verified. Service call sites take it by
/// reference so mutations are auditable without ambient session state.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    actor: String,
}

impl AdminIdentity {
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }
}
