//! Askama view structs and rendering helpers for the public and admin pages.

use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::posts::{FieldErrors, PostFields};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Render the shared error page with a 404 status, carrying the slug the
/// client asked for in both the page body and the diagnostic report.
pub fn render_not_found_response(site_title: String, slug: &str) -> Response {
    let view = LayoutContext::new(site_title, ErrorPageView::post_not_found(slug));
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        format!("no post stored under slug `{slug}`"),
    )
    .attach(&mut response);
    response
}

/// Site chrome plus the page-specific content every template receives.
#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: String,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(site_title: String, content: T) -> Self {
        Self {
            site_title,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PostListItemView {
    pub title: String,
    pub href: String,
}

pub struct PostListView {
    pub posts: Vec<PostListItemView>,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<PostListView>,
}

pub struct PostDetailView {
    pub title: String,
    pub body_html: String,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

#[derive(Clone)]
pub struct AdminPostRowView {
    pub title: String,
    pub slug: String,
    pub edit_href: String,
}

pub struct AdminPostListView {
    pub posts: Vec<AdminPostRowView>,
    pub new_post_href: String,
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub view: LayoutContext<AdminPostListView>,
}

/// Editor state for both the blank "new post" form and the populated edit
/// form, including per-field messages after a failed submission.
pub struct PostEditorView {
    pub heading: String,
    pub action_href: String,
    pub is_new: bool,
    pub values: PostFields,
    pub errors: FieldErrors,
}

impl PostEditorView {
    pub fn new_post() -> Self {
        Self {
            heading: "New post".to_string(),
            action_href: "/posts/admin/new".to_string(),
            is_new: true,
            values: PostFields::default(),
            errors: FieldErrors::default(),
        }
    }

    pub fn edit(original_slug: &str, values: PostFields) -> Self {
        Self {
            heading: format!("Edit `{original_slug}`"),
            action_href: format!("/posts/admin/{original_slug}"),
            is_new: false,
            values,
            errors: FieldErrors::default(),
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct AdminEditorTemplate {
    pub view: LayoutContext<PostEditorView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn post_not_found(slug: &str) -> Self {
        Self {
            title: "Post not found".to_string(),
            message: format!("No post exists under `{slug}`."),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
