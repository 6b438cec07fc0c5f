use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::{posts::PostService, render::render_markdown};
use crate::presentation::views::{
    IndexTemplate, LayoutContext, PostDetailView, PostListItemView, PostListView, PostTemplate,
    render_not_found_response, render_template_response,
};

use super::post_error_to_http;

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub site_title: String,
}

pub(crate) async fn posts_index(State(state): State<HttpState>) -> Response {
    let summaries = match state.posts.list_summaries().await {
        Ok(summaries) => summaries,
        Err(err) => {
            return post_error_to_http("infra::http::public::posts_index", err).into_response();
        }
    };

    let posts = summaries
        .into_iter()
        .map(|summary| PostListItemView {
            href: format!("/posts/{}", summary.slug),
            title: summary.title,
        })
        .collect();

    let view = LayoutContext::new(state.site_title.clone(), PostListView { posts });
    render_template_response(IndexTemplate { view }, StatusCode::OK)
}

pub(crate) async fn post_detail(
    State(state): State<HttpState>,
    Path(slug): Path<String>,
) -> Response {
    let post = match state.posts.get_post(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return render_not_found_response(state.site_title.clone(), &slug),
        Err(err) => {
            return post_error_to_http("infra::http::public::post_detail", err).into_response();
        }
    };

    // The HTML is derived on every read; nothing rendered is ever stored.
    let content = PostDetailView {
        title: post.title,
        body_html: render_markdown(&post.body_markdown),
    };

    let view = LayoutContext::new(state.site_title.clone(), content);
    render_template_response(PostTemplate { view }, StatusCode::OK)
}
