//! Postgres-backed repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    FromRow,
    postgres::{PgPool, PgPoolOptions},
    query, query_as,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{PostParams, PostsRepo, RepoError};
use crate::domain::entities::{PostRecord, PostSummary};

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }
}

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.message().contains("duplicate key") => {
            RepoError::Duplicate {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("violates") => RepoError::Integrity {
            message: db.message().to_string(),
        },
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to user request") =>
        {
            RepoError::Timeout
        }
        other => RepoError::from_persistence(other),
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    slug: String,
    title: String,
    body_markdown: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        PostRecord {
            id: row.id,
            slug: row.slug,
            title: row.title,
            body_markdown: row.body_markdown,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    slug: String,
    title: String,
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row = query_as::<_, PostRow>(
            "SELECT id, slug, title, body_markdown, created_at, updated_at \
             FROM posts WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        let rows = query_as::<_, SummaryRow>(
            "SELECT slug, title FROM posts ORDER BY created_at, id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| PostSummary {
                slug: row.slug,
                title: row.title,
            })
            .collect())
    }

    async fn insert(&self, params: PostParams) -> Result<PostRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = query_as::<_, PostRow>(
            "INSERT INTO posts (id, slug, title, body_markdown, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) \
             RETURNING id, slug, title, body_markdown, created_at, updated_at",
        )
        .bind(id)
        .bind(&params.slug)
        .bind(&params.title)
        .bind(&params.body_markdown)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn replace(&self, slug: &str, params: PostParams) -> Result<PostRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let row = query_as::<_, PostRow>(
            "UPDATE posts SET slug = $2, title = $3, body_markdown = $4, updated_at = $5 \
             WHERE slug = $1 \
             RETURNING id, slug, title, body_markdown, created_at, updated_at",
        )
        .bind(slug)
        .bind(&params.slug)
        .bind(&params.title)
        .bind(&params.body_markdown)
        .bind(now)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(PostRecord::from).ok_or(RepoError::NotFound)
    }

    async fn remove(&self, slug: &str) -> Result<u64, RepoError> {
        let result = query("DELETE FROM posts WHERE slug = $1")
            .bind(slug)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
