// Shared helpers; not every test binary uses each one.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use stockfolio::app::build_app;
use stockfolio::state::AppState;

/// Build the full application router plus the state behind it.
///
/// The state carries a lazy pool that never connects unless a test actually
/// reaches the database, so routing, sessions, cookies, and form validation
/// are all testable without PostgreSQL. The state comes back too so tests
/// can seed sessions directly.
pub fn build_test_app() -> (Router, AppState) {
    let state = AppState::fake();
    (build_app(state.clone()), state)
}

pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_with_cookie(app: Router, path: &str, cookie: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_form(app: Router, path: &str, form: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_form_with_cookie(
    app: Router,
    path: &str,
    form: &str,
    cookie: &str,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(form.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect the response body as UTF-8 text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Every Set-Cookie header value on the response.
pub fn set_cookie_values(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// The non-empty `name=value` pairs from the response's Set-Cookie headers,
/// joined ready for a Cookie request header. Removal cookies (empty values)
/// are dropped, the way a browser honoring them would.
pub fn cookie_header(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter(|pair| {
            pair.split_once('=')
                .map(|(_, value)| !value.is_empty())
                .unwrap_or(false)
        })
        .collect::<Vec<_>>()
        .join("; ")
}
