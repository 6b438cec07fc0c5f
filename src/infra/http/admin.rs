//! Admin subtree handlers: the post list, the editor form, and the single
//! submit endpoint that dispatches on the submitted `intent`.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::application::posts::{FieldErrors, PostError, PostFields};
use crate::domain::entities::AdminIdentity;
use crate::presentation::views::{
    AdminEditorTemplate, AdminPostRowView, AdminPostListView, AdminPostsTemplate, LayoutContext,
    PostEditorView, render_not_found_response, render_template_response,
};

use super::{HttpState, post_error_to_http};

/// Path segment that selects the blank editor and the create action.
const NEW_SLUG: &str = "new";

const INTENT_DELETE: &str = "delete";

#[derive(Debug, Deserialize)]
pub(crate) struct AdminPostForm {
    #[serde(default)]
    intent: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    markdown: String,
}

impl AdminPostForm {
    fn into_fields(self) -> PostFields {
        PostFields {
            title: self.title,
            slug: self.slug,
            markdown: self.markdown,
        }
    }
}

pub(crate) async fn admin_posts(State(state): State<HttpState>) -> Response {
    let summaries = match state.posts.list_summaries().await {
        Ok(summaries) => summaries,
        Err(err) => {
            return post_error_to_http("infra::http::admin::admin_posts", err).into_response();
        }
    };

    let posts = summaries
        .into_iter()
        .map(|summary| AdminPostRowView {
            edit_href: format!("/posts/admin/{}", summary.slug),
            title: summary.title,
            slug: summary.slug,
        })
        .collect();

    let content = AdminPostListView {
        posts,
        new_post_href: format!("/posts/admin/{NEW_SLUG}"),
    };
    let view = LayoutContext::new(state.site_title.clone(), content);
    render_template_response(AdminPostsTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_editor(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Response {
    if slug == NEW_SLUG {
        let view = LayoutContext::new(state.site_title.clone(), PostEditorView::new_post());
        return render_template_response(AdminEditorTemplate { view }, StatusCode::OK);
    }

    let post = match state.posts.get_post(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return render_not_found_response(state.site_title.clone(), &slug),
        Err(err) => {
            return post_error_to_http("infra::http::admin::admin_editor", err).into_response();
        }
    };

    let values = PostFields {
        title: post.title,
        slug: post.slug,
        markdown: post.body_markdown,
    };
    let view = LayoutContext::new(state.site_title.clone(), PostEditorView::edit(&slug, values));
    render_template_response(AdminEditorTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_submit(
    State(state): State<HttpState>,
    Extension(admin): Extension<AdminIdentity>,
    Path(slug): Path<String>,
    Form(form): Form<AdminPostForm>,
) -> Response {
    if form.intent == INTENT_DELETE {
        return match state.posts.delete_post(&admin, &slug).await {
            Ok(()) => Redirect::to("/posts/admin").into_response(),
            Err(err) => {
                post_error_to_http("infra::http::admin::admin_submit", err).into_response()
            }
        };
    }

    let fields = form.into_fields();
    let result = if slug == NEW_SLUG {
        state.posts.create_post(&admin, fields.clone()).await
    } else {
        state.posts.update_post(&admin, &slug, fields.clone()).await
    };

    match result {
        Ok(_) => Redirect::to("/posts/admin").into_response(),
        Err(PostError::Invalid(errors)) => rerender_editor(&state, &slug, fields, errors),
        Err(PostError::SlugTaken { slug: taken }) => {
            let errors = FieldErrors {
                slug: Some(format!("The slug `{taken}` is already in use.")),
                ..FieldErrors::default()
            };
            rerender_editor(&state, &slug, fields, errors)
        }
        Err(PostError::NotFound { slug: missing }) => {
            render_not_found_response(state.site_title.clone(), &missing)
        }
        Err(err) => post_error_to_http("infra::http::admin::admin_submit", err).into_response(),
    }
}

/// Failed submissions stay on the same path: the form comes back with the
/// submitted values and the full per-field error map, never a redirect.
fn rerender_editor(
    state: &HttpState,
    path_slug: &str,
    values: PostFields,
    errors: FieldErrors,
) -> Response {
    let editor = if path_slug == NEW_SLUG {
        let mut editor = PostEditorView::new_post();
        editor.values = values;
        editor
    } else {
        PostEditorView::edit(path_slug, values)
    };

    let view = LayoutContext::new(state.site_title.clone(), editor.with_errors(errors));
    render_template_response(AdminEditorTemplate { view }, StatusCode::OK)
}
