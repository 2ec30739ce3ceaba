//! End-to-end account lifecycle against a live PostgreSQL database.
//!
//! Ignored by default so the suite stays green without infrastructure.
//! Point DATABASE_URL at a disposable database and run:
//!
//!     cargo test --test auth_flow -- --ignored

mod common;

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::Response;
use common::{
    body_text, cookie_header, get_with_cookie, post_form, post_form_with_cookie,
    set_cookie_values,
};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use stockfolio::app::build_app;
use stockfolio::config::{AppConfig, SessionConfig};
use stockfolio::mailer::LogMailer;
use stockfolio::sessions::SessionStore;
use stockfolio::state::AppState;

async fn db_state() -> AppState {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let db = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("connect to the test database");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("apply migrations");

    let config = Arc::new(AppConfig {
        database_url,
        session: SessionConfig {
            ttl_hours: 12,
            remember_ttl_days: 14,
        },
        mail_from: "no-reply@stockfolio.test".into(),
    });
    let sessions = Arc::new(SessionStore::new(&config.session));
    let mailer = Arc::new(LogMailer::new(config.mail_from.clone()));
    AppState::from_parts(db, config, sessions, mailer)
}

/// Unique address per run so the scenario can repeat against the same
/// database. Dots keep the form body free of characters that need escaping.
fn fresh_email() -> (String, String) {
    let email = format!("siri.{}@email.com", Uuid::new_v4().simple());
    let encoded = email.replace('@', "%40");
    (email, encoded)
}

fn session_set_cookie(response: &Response) -> String {
    set_cookie_values(response)
        .into_iter()
        .find(|v| v.starts_with("session="))
        .expect("login must set the session cookie")
}

#[tokio::test]
#[ignore = "needs a live PostgreSQL; set DATABASE_URL and run with -- --ignored"]
async fn full_account_lifecycle() {
    let state = db_state().await;
    let app = || build_app(state.clone());
    let (email, email_enc) = fresh_email();
    let password = "privatePassword123";

    // Register; the welcome notice rides the redirect to the login page.
    let response = post_form(
        app(),
        "/users/register",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/users/login"
    );
    let cookies = cookie_header(&response);
    let login_page = get_with_cookie(app(), "/users/login", &cookies).await;
    let body = body_text(login_page).await;
    assert!(body.contains(&format!("Thanks for registering, {email}!")));

    // Registering the same address again is rejected.
    let response = post_form(
        app(),
        "/users/register",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!("ERROR! Email ({email}) already exists!")));

    // A wrong password fails with the generic notice and no session.
    let response = post_form(
        app(),
        "/users/login",
        &format!("email={email_enc}&password=wrongPassword999"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("ERROR! Incorrect login credentials."));

    // Correct credentials with a stored intent land on the profile.
    let response = post_form(
        app(),
        "/users/login?next=%2Fusers%2Fprofile",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/users/profile"
    );
    let session_cookies = cookie_header(&response);
    assert!(session_cookies.contains("session="));

    let response = get_with_cookie(app(), "/users/profile", &session_cookies).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&email));

    // A hostile next while logged in short-circuits to home.
    let response = get_with_cookie(
        app(),
        "/users/login?next=http://www.badsite.com",
        &session_cookies,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    let response = get_with_cookie(app(), "/users/profile", &session_cookies).await;
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "the session must survive the ignored hostile next"
    );

    // An anonymous login with a hostile next passes the credential check,
    // then loses the fresh session when the target is rejected.
    let response = post_form(
        app(),
        "/users/login?next=http%3A%2F%2Fwww.badsite.com",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        set_cookie_values(&response)
            .iter()
            .any(|v| v.starts_with("session=;")),
        "the just-issued session cookie must be cleared"
    );
    let body = body_text(response).await;
    assert!(body.contains("Bad Request (400)"));

    // Logout returns the browser to anonymous.
    let response = get_with_cookie(app(), "/users/logout", &session_cookies).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    let goodbye = cookie_header(&response);
    let home = get_with_cookie(app(), "/", &goodbye).await;
    let body = body_text(home).await;
    assert!(body.contains("Goodbye!"));

    // The revoked cookie no longer opens guarded pages.
    let response = get_with_cookie(app(), "/users/profile", &session_cookies).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/users/login?next=%2Fusers%2Fprofile"
    );
}

#[tokio::test]
#[ignore = "needs a live PostgreSQL; set DATABASE_URL and run with -- --ignored"]
async fn remember_me_controls_cookie_persistence() {
    let state = db_state().await;
    let app = || build_app(state.clone());
    let (_email, email_enc) = fresh_email();
    let password = "privatePassword123";

    let response = post_form(
        app(),
        "/users/register",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    // Ticking the checkbox makes the cookie outlive the browser session.
    let response = post_form(
        app(),
        "/users/login",
        &format!("email={email_enc}&password={password}&remember_me=on"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let cookie = session_set_cookie(&response);
    assert!(
        cookie.contains("Max-Age="),
        "remembered session cookie must carry Max-Age: {cookie}"
    );
    assert!(cookie.contains("HttpOnly"));

    // Without it the cookie stays browser-session scoped.
    let response = post_form(
        app(),
        "/users/login",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let cookie = session_set_cookie(&response);
    assert!(
        !cookie.contains("Max-Age="),
        "plain session cookie must not carry Max-Age: {cookie}"
    );
}

#[tokio::test]
#[ignore = "needs a live PostgreSQL; set DATABASE_URL and run with -- --ignored"]
async fn add_stock_persists_and_lists() {
    let state = db_state().await;
    let app = || build_app(state.clone());
    let (_email, email_enc) = fresh_email();
    let password = "privatePassword123";

    let response = post_form(
        app(),
        "/users/register",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = post_form(
        app(),
        "/users/login",
        &format!("email={email_enc}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    let session_cookies = cookie_header(&response);

    // A fresh account has an empty portfolio.
    let response = get_with_cookie(app(), "/stocks/", &session_cookies).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("No stocks have been added yet."));

    // The symbol is uppercased and the price stored as exact cents.
    let response = post_form_with_cookie(
        app(),
        "/add_stock",
        "stock_symbol=sbux&number_of_shares=100&purchase_price=45.67",
        &session_cookies,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/stocks/"
    );

    let combined = format!("{session_cookies}; {}", cookie_header(&response));
    let response = get_with_cookie(app(), "/stocks/", &combined).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Added new stock (SBUX)!"));
    assert!(body.contains("<td>SBUX</td>"));
    assert!(body.contains("<td>100</td>"));
    assert!(body.contains("<td>45.67</td>"));
}
