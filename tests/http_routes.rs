mod common;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{
        Request, StatusCode,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, LOCATION},
    },
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use foglio::application::posts::PostService;
use foglio::application::repos::PostsRepo;
use foglio::infra::http::{AdminGate, HttpState, build_router};

use common::MemoryPostsRepo;

const TOKEN: &str = "test-admin-token";

fn router(repo: Arc<MemoryPostsRepo>) -> Router {
    let posts = Arc::new(PostService::new(repo as Arc<dyn PostsRepo>));
    let state = HttpState {
        posts,
        site_title: "Test Blog".to_string(),
    };
    build_router(state, AdminGate::new(TOKEN, "/posts"))
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

fn admin_get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

fn admin_post(path: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(AUTHORIZATION, format!("Bearer {TOKEN}"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn public_index_lists_stored_posts() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[
        ("hello", "Hello World", "# Hi"),
        ("second", "Second Post", "body"),
    ]));

    let response = router(repo).oneshot(get("/posts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Hello World"));
    assert!(body.contains("/posts/second"));
}

#[tokio::test]
async fn public_detail_renders_markdown_on_read() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[("hello", "Hello", "# Hi")]));

    let response = router(repo).oneshot(get("/posts/hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("<h1>Hi</h1>"));
    assert!(body.contains("Hello"));
}

#[tokio::test]
async fn public_detail_of_an_absent_slug_is_a_404_carrying_the_slug() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let response = router(repo).oneshot(get("/posts/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_string(response).await;
    assert!(body.contains("missing"));
}

#[tokio::test]
async fn admin_routes_without_a_token_never_reach_the_store() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[("hello", "Hello", "# Hi")]));

    let response = router(repo.clone()).oneshot(get("/posts/admin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let form = "intent=delete";
    let request = Request::builder()
        .method("POST")
        .uri("/posts/admin/hello")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();
    let response = router(repo.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(repo.call_count(), 0);
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn browser_requests_without_a_token_are_redirected_to_login() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let request = Request::builder()
        .uri("/posts/admin")
        .header(ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let response = router(repo.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/posts");
    assert_eq!(repo.call_count(), 0);
}

#[tokio::test]
async fn an_invalid_bearer_token_is_rejected() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let request = Request::builder()
        .uri("/posts/admin")
        .header(AUTHORIZATION, "Bearer wrong-token")
        .body(Body::empty())
        .unwrap();
    let response = router(repo.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(repo.call_count(), 0);
}

#[tokio::test]
async fn the_admin_cookie_is_accepted_as_a_credential() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let request = Request::builder()
        .uri("/posts/admin")
        .header("cookie", format!("foglio_admin={TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = router(repo).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_list_shows_edit_links() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[("hello", "Hello", "# Hi")]));

    let response = router(repo).oneshot(admin_get("/posts/admin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("/posts/admin/hello"));
    assert!(body.contains("/posts/admin/new"));
}

#[tokio::test]
async fn the_new_editor_is_a_blank_form() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let response = router(repo)
        .oneshot(admin_get("/posts/admin/new"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("name=\"title\""));
    assert!(body.contains("name=\"markdown\""));
    assert!(!body.contains("Delete post"));
}

#[tokio::test]
async fn the_edit_form_is_populated_and_offers_delete() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[("hello", "Hello", "# Hi")]));

    let response = router(repo)
        .oneshot(admin_get("/posts/admin/hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("value=\"Hello\""));
    assert!(body.contains("# Hi"));
    assert!(body.contains("Delete post"));
}

#[tokio::test]
async fn editing_an_absent_slug_is_a_404() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let response = router(repo)
        .oneshot(admin_get("/posts/admin/missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn creating_a_post_redirects_and_publishes_it() {
    let repo = Arc::new(MemoryPostsRepo::new());
    let app = router(repo.clone());

    let form = "intent=save&title=Hello&slug=hello&markdown=%23%20Hi";
    let response = app
        .clone()
        .oneshot(admin_post("/posts/admin/new", form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/posts/admin");
    assert_eq!(repo.len(), 1);

    let response = app.oneshot(get("/posts/hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("<h1>Hi</h1>"));
}

#[tokio::test]
async fn an_invalid_submission_rerenders_the_form_with_every_field_error() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let form = "intent=save&title=&slug=&markdown=";
    let response = router(repo.clone())
        .oneshot(admin_post("/posts/admin/new", form))
        .await
        .unwrap();

    // Stays on the form, no redirect, no store mutation.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repo.len(), 0);

    let body = body_string(response).await;
    assert!(body.contains("Title is required."));
    assert!(body.contains("Slug is required."));
    assert!(body.contains("Content is required."));
}

#[tokio::test]
async fn a_partially_invalid_submission_keeps_the_submitted_values() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let form = "intent=save&title=Hello&slug=&markdown=body";
    let response = router(repo)
        .oneshot(admin_post("/posts/admin/new", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("value=\"Hello\""));
    assert!(body.contains("Slug is required."));
    assert!(!body.contains("Title is required."));
}

#[tokio::test]
async fn creating_with_a_taken_slug_flags_the_slug_field() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[("hello", "Hello", "# Hi")]));

    let form = "intent=save&title=Another&slug=hello&markdown=body";
    let response = router(repo.clone())
        .oneshot(admin_post("/posts/admin/new", form))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(repo.len(), 1);

    let body = body_string(response).await;
    assert!(body.contains("already in use"));
}

#[tokio::test]
async fn updating_a_post_can_move_it_to_a_new_slug() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[("old-slug", "T", "M")]));
    let app = router(repo);

    let form = "intent=save&title=T&slug=new-slug&markdown=M";
    let response = app
        .clone()
        .oneshot(admin_post("/posts/admin/old-slug", form))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.clone().oneshot(get("/posts/old-slug")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/posts/new-slug")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn a_delete_intent_removes_the_post_and_redirects() {
    let repo = Arc::new(MemoryPostsRepo::seeded(&[("hello", "Hello", "# Hi")]));
    let app = router(repo.clone());

    let response = app
        .clone()
        .oneshot(admin_post("/posts/admin/hello", "intent=delete"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/posts/admin");
    assert_eq!(repo.len(), 0);

    let response = app.oneshot(get("/posts/hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_absent_slug_still_redirects() {
    let repo = Arc::new(MemoryPostsRepo::new());

    let response = router(repo)
        .oneshot(admin_post("/posts/admin/missing", "intent=delete"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
