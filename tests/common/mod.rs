//! Shared in-memory repository for service and router tests.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use foglio::application::repos::{PostParams, PostsRepo, RepoError};
use foglio::domain::entities::{PostRecord, PostSummary};

/// Vec-backed store preserving insertion order, with a call counter so tests
/// can assert that rejected requests never touched it.
#[derive(Default)]
pub struct MemoryPostsRepo {
    posts: Mutex<Vec<PostRecord>>,
    calls: AtomicUsize,
}

impl MemoryPostsRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(entries: &[(&str, &str, &str)]) -> Self {
        let repo = Self::new();
        {
            let mut posts = repo.posts.lock().unwrap();
            for (slug, title, markdown) in entries {
                posts.push(record(slug, title, markdown));
            }
        }
        repo
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn record(slug: &str, title: &str, markdown: &str) -> PostRecord {
    let now = OffsetDateTime::now_utc();
    PostRecord {
        id: Uuid::new_v4(),
        slug: slug.to_string(),
        title: title.to_string(),
        body_markdown: markdown.to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl PostsRepo for MemoryPostsRepo {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        self.touch();
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|post| post.slug == slug).cloned())
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        self.touch();
        let posts = self.posts.lock().unwrap();
        Ok(posts
            .iter()
            .map(|post| PostSummary {
                slug: post.slug.clone(),
                title: post.title.clone(),
            })
            .collect())
    }

    async fn insert(&self, params: PostParams) -> Result<PostRecord, RepoError> {
        self.touch();
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }

        let post = record(&params.slug, &params.title, &params.body_markdown);
        posts.push(post.clone());
        Ok(post)
    }

    async fn replace(&self, slug: &str, params: PostParams) -> Result<PostRecord, RepoError> {
        self.touch();
        let mut posts = self.posts.lock().unwrap();

        if params.slug != slug && posts.iter().any(|post| post.slug == params.slug) {
            return Err(RepoError::Duplicate {
                constraint: "posts_slug_key".to_string(),
            });
        }

        let existing = posts
            .iter_mut()
            .find(|post| post.slug == slug)
            .ok_or(RepoError::NotFound)?;

        existing.slug = params.slug;
        existing.title = params.title;
        existing.body_markdown = params.body_markdown;
        existing.updated_at = OffsetDateTime::now_utc();
        Ok(existing.clone())
    }

    async fn remove(&self, slug: &str) -> Result<u64, RepoError> {
        self.touch();
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.slug != slug);
        Ok((before - posts.len()) as u64)
    }
}
