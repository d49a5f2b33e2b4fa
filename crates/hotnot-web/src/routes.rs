//! Web routes for the board.

use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{ConnectInfo, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use hotnot_board::{Board, BoardError, Submission, TopicTitle};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tracing::debug;

use crate::error::WebError;
use crate::pages;

/// Shared application state.
pub struct AppState {
    pub board: Board,
}

/// Create the web router.
pub fn create_router(board: Board, images_dir: &FsPath) -> Router {
    let state = Arc::new(AppState { board });

    Router::new()
        .route("/", get(index))
        .route("/topics/", get(topics))
        .route("/view/{title}", get(view))
        .route("/edit/{title}", get(edit))
        .route("/save/{title}", post(save))
        .route("/new/", get(new_topic))
        .nest_service("/images", ServeDir::new(images_dir))
        .fallback(to_topics)
        .with_state(state)
}

#[derive(Deserialize)]
struct NewTopicQuery {
    topic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SaveForm {
    markdown: String,
    mode: String,
    assessment: String,
    next: String,
}

async fn index() -> Redirect {
    Redirect::to("/topics/")
}

async fn to_topics() -> Redirect {
    Redirect::to("/topics/")
}

async fn topics(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Html<String>, WebError> {
    let viewer = state.board.resolve_socket(addr);
    let listing = state.board.list_topics(&viewer)?;
    Ok(Html(pages::topics_page(&listing)))
}

async fn view(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, WebError> {
    let Some(title) = valid_title(&title) else {
        return Ok(to_topics().await.into_response());
    };
    let viewer = state.board.resolve_socket(addr);

    let page = match state.board.load_topic(&title, &viewer) {
        Ok(page) => page,
        Err(BoardError::NotFound(_)) => {
            return Ok(Redirect::to(&format!("/edit/{}", title)).into_response());
        }
        Err(e) => return Err(e.into()),
    };
    let comments = state.board.collect_comments(&title)?;

    Ok(Html(pages::view_page(&page, &comments)).into_response())
}

async fn edit(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Response, WebError> {
    let Some(title) = valid_title(&title) else {
        return Ok(to_topics().await.into_response());
    };
    let markdown = state
        .board
        .store()
        .get_body(&title)?
        .map(|body| String::from_utf8_lossy(&body).into_owned())
        .unwrap_or_default();

    Ok(Html(pages::edit_page(&title, &markdown)).into_response())
}

async fn save(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect, WebError> {
    let Some(title) = valid_title(&title) else {
        return Ok(to_topics().await);
    };
    let submission = Submission::from_form(&form.mode, &form.markdown, &form.assessment)?;
    let identity = state.board.resolve_socket(addr);
    state.board.save(&title, &identity, &submission)?;

    if form.next == "Next" {
        return Ok(match state.board.next_topic(&identity, &title)? {
            Some(next) => Redirect::to(&format!("/view/{}", next)),
            None => Redirect::to("/topics/"),
        });
    }
    Ok(Redirect::to(&format!("/view/{}", title)))
}

async fn new_topic(Query(query): Query<NewTopicQuery>) -> Redirect {
    match query.topic.as_deref().and_then(valid_title) {
        Some(title) => Redirect::to(&format!("/edit/{}", title)),
        None => Redirect::to("/topics/"),
    }
}

fn valid_title(raw: &str) -> Option<TopicTitle> {
    match TopicTitle::parse(raw) {
        Ok(title) => Some(title),
        Err(e) => {
            debug!(title = raw, error = %e, "rejecting title");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{Request, StatusCode, header};
    use hotnot_board::BoardConfig;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn create_test_router(dir: &TempDir, octet: u8) -> Router {
        let board = Board::open(
            BoardConfig::new(dir.path().join("data")).with_users_dir(dir.path().join("users")),
        );
        create_router(board, &dir.path().join("images"))
            .layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, octet], 5000))))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn save_request(title: &str, form: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/save/{}", title))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_redirects_to_topics() {
        let dir = tempfile::tempdir().unwrap();
        let response = create_test_router(&dir, 1)
            .oneshot(get_request("/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/topics/");
    }

    #[tokio::test]
    async fn test_invalid_title_redirects_to_topics() {
        let dir = tempfile::tempdir().unwrap();
        let response = create_test_router(&dir, 1)
            .oneshot(get_request("/view/bad_title"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/topics/");
    }

    #[tokio::test]
    async fn test_view_without_body_redirects_to_edit() {
        let dir = tempfile::tempdir().unwrap();
        let response = create_test_router(&dir, 1)
            .oneshot(get_request("/view/go"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/edit/go");
    }

    #[tokio::test]
    async fn test_save_edit_then_view() {
        let dir = tempfile::tempdir().unwrap();

        let response = create_test_router(&dir, 1)
            .oneshot(save_request("go", "mode=edit&markdown=%23+Go%0A"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/go");

        let response = create_test_router(&dir, 1)
            .oneshot(get_request("/view/go"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Go</h1>"));
    }

    #[tokio::test]
    async fn test_unknown_mode_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let response = create_test_router(&dir, 1)
            .oneshot(save_request("go", "mode=delete&markdown=x"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!dir.path().join("data").exists());
    }

    #[tokio::test]
    async fn test_next_goes_to_unseen_topic() {
        let dir = tempfile::tempdir().unwrap();
        for title in ["one", "two"] {
            create_test_router(&dir, 1)
                .oneshot(save_request(title, "mode=edit&markdown=body"))
                .await
                .unwrap();
        }

        let response = create_test_router(&dir, 2)
            .oneshot(save_request(
                "one",
                "mode=comment&markdown=nice&assessment=Hot&next=Next",
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/view/two");

        let response = create_test_router(&dir, 2)
            .oneshot(save_request(
                "two",
                "mode=comment&markdown=meh&assessment=Not&next=Next",
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/topics/");
    }

    #[tokio::test]
    async fn test_topics_lists_hotness() {
        let dir = tempfile::tempdir().unwrap();
        create_test_router(&dir, 1)
            .oneshot(save_request("go", "mode=edit&markdown=body"))
            .await
            .unwrap();
        create_test_router(&dir, 1)
            .oneshot(save_request("go", "mode=comment&markdown=yes&assessment=Hot"))
            .await
            .unwrap();

        let response = create_test_router(&dir, 2)
            .oneshot(get_request("/topics/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"href="/view/go""#));
        assert!(html.contains("100% hot"));
        assert!(html.contains("New to you (1)"));
    }

    #[tokio::test]
    async fn test_unrecognised_stored_assessment_still_lists() {
        let dir = tempfile::tempdir().unwrap();
        create_test_router(&dir, 1)
            .oneshot(save_request("go", "mode=edit&markdown=body"))
            .await
            .unwrap();
        create_test_router(&dir, 1)
            .oneshot(save_request("go", "mode=comment&markdown=yes"))
            .await
            .unwrap();
        let token = hotnot_board::digest("10.0.0.1");
        std::fs::write(
            dir.path().join("data").join(format!("go_assessment_{}.md", token)),
            "hot",
        )
        .unwrap();

        let response = create_test_router(&dir, 2)
            .oneshot(get_request("/topics/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("1 shrug"));

        let response = create_test_router(&dir, 1)
            .oneshot(get_request("/view/go"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_new_topic_redirects_to_edit() {
        let dir = tempfile::tempdir().unwrap();
        let response = create_test_router(&dir, 1)
            .oneshot(get_request("/new/?topic=zig"))
            .await
            .unwrap();

        assert_eq!(location(&response), "/edit/zig");
    }
}
