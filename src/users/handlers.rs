use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    flash::Flash,
    mailer,
    sessions::{IssuedSession, SESSION_COOKIE},
    state::AppState,
    users::{
        extractors::{MaybeUser, RequireUser},
        forms::{LoginForm, RegisterForm},
        password,
        redirect::{self, NextTarget},
        repo::{CreateUserError, User},
    },
    views,
};

/// Where a login without a redirect intent lands.
const DEFAULT_LANDING: &str = "/";

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", get(register_form).post(register_submit))
        .route("/users/profile", get(profile))
        .route("/users/admin", get(admin))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/users/login", get(login_form).post(login_submit))
        .route("/users/logout", get(logout))
}

#[derive(Debug, Deserialize)]
struct NextQuery {
    next: Option<String>,
}

fn session_cookie(issued: &IssuedSession) -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    if issued.remember {
        // A Max-Age makes the cookie persistent; without one it dies with
        // the browser session.
        cookie.set_max_age(issued.expires_at - OffsetDateTime::now_utc());
    }
    cookie
}

fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

async fn register_form(jar: CookieJar) -> Response {
    let (jar, messages) = Flash::read(&jar).take(jar);
    (jar, views::register_page(&messages, "", &[])).into_response()
}

#[instrument(skip(state, jar, form))]
async fn register_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        warn!(email = %form.email, "registration form failed validation");
        let (jar, messages) = Flash::read(&jar).take(jar);
        return Ok((jar, views::register_page(&messages, &form.email, &errors)).into_response());
    }

    let password_hash = password::hash_password(&form.password)?;
    match User::create(&state.db, &form.email, &password_hash).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            mailer::dispatch_welcome(state.mailer.clone(), user.email.clone());
            let mut flash = Flash::read(&jar);
            flash.success(format!("Thanks for registering, {}!", user.email));
            Ok(flash.redirect(jar, "/users/login"))
        }
        Err(CreateUserError::DuplicateEmail { email }) => {
            warn!(%email, "registration with an existing email");
            let mut flash = Flash::read(&jar);
            flash.error(format!("ERROR! Email ({email}) already exists!"));
            let (jar, messages) = flash.take(jar);
            Ok((jar, views::register_page(&messages, &form.email, &[])).into_response())
        }
        Err(CreateUserError::Database(e)) => Err(e.into()),
    }
}

#[instrument(skip(identity, jar))]
async fn login_form(
    identity: MaybeUser,
    Query(query): Query<NextQuery>,
    jar: CookieJar,
) -> Response {
    if identity.0.is_some() {
        let mut flash = Flash::read(&jar);
        flash.info("Already logged in!");
        return flash.redirect(jar, DEFAULT_LANDING);
    }
    let (jar, messages) = Flash::read(&jar).take(jar);
    (
        jar,
        views::login_page(&messages, "", &[], query.next.as_deref()),
    )
        .into_response()
}

#[instrument(skip(state, identity, jar, form))]
async fn login_submit(
    State(state): State<AppState>,
    identity: MaybeUser,
    Query(query): Query<NextQuery>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    // A live session short-circuits everything else, the `next` value
    // included: a hostile target from a logged-in user never reaches the
    // validator.
    if let MaybeUser(Some(session)) = identity {
        info!(user_id = %session.user_id, "login attempt while already authenticated");
        let mut flash = Flash::read(&jar);
        flash.info("Already logged in!");
        return Ok(flash.redirect(jar, DEFAULT_LANDING));
    }

    let next = query.next.as_deref().unwrap_or_default();

    let errors = form.validate();
    if !errors.is_empty() {
        let (jar, messages) = Flash::read(&jar).take(jar);
        return Ok((
            jar,
            views::login_page(&messages, &form.email, &errors, Some(next)),
        )
            .into_response());
    }

    let user = match User::find_by_email(&state.db, &form.email).await? {
        Some(user) => {
            if password::verify_password(&form.password, &user.password_hash)? {
                Some(user)
            } else {
                None
            }
        }
        None => {
            // Unknown email burns the same argon2 work as a mismatch.
            password::verify_dummy(&form.password);
            None
        }
    };

    let Some(user) = user else {
        warn!(email = %form.email, "login with incorrect credentials");
        let mut flash = Flash::read(&jar);
        flash.error("ERROR! Incorrect login credentials.");
        let (jar, messages) = flash.take(jar);
        return Ok((
            jar,
            views::login_page(&messages, &form.email, &[], Some(next)),
        )
            .into_response());
    };

    let issued = state.sessions.issue(user.id, form.remember());
    info!(user_id = %user.id, email = %user.email, remember = issued.remember, "user logged in");

    // The session exists before the redirect intent is inspected; a hostile
    // target tears it straight back down.
    match redirect::validate(next) {
        Ok(NextTarget::None) => {
            let jar = jar.add(session_cookie(&issued));
            Ok(Flash::read(&jar).redirect(jar, DEFAULT_LANDING))
        }
        Ok(NextTarget::Path(path)) => {
            let jar = jar.add(session_cookie(&issued));
            Ok(Flash::read(&jar).redirect(jar, &path))
        }
        Err(rejected) => {
            state.sessions.revoke(&issued.token);
            let jar = clear_session_cookie(jar);
            let error = AppError::BadRequest(rejected.to_string());
            Ok((jar, error.into_response()).into_response())
        }
    }
}

#[instrument(skip(state, session, jar))]
async fn logout(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: CookieJar,
) -> Response {
    state.sessions.revoke(&session.token);
    info!(user_id = %session.user_id, "user logged out");
    let jar = clear_session_cookie(jar);
    let mut flash = Flash::read(&jar);
    flash.info("Goodbye!");
    flash.redirect(jar, DEFAULT_LANDING)
}

#[instrument(skip(state, session, jar))]
async fn profile(
    State(state): State<AppState>,
    RequireUser(session): RequireUser,
    jar: CookieJar,
) -> AppResult<Response> {
    let Some(user) = User::find_by_id(&state.db, session.user_id).await? else {
        // The session outlived its user row; treat the caller as logged out.
        warn!(user_id = %session.user_id, "session points at a missing user");
        state.sessions.revoke(&session.token);
        let jar = clear_session_cookie(jar);
        let mut flash = Flash::read(&jar);
        flash.info("Please log in to access this page.");
        return Ok(flash.redirect(jar, "/users/login"));
    };

    let member_since = user.created_at.date().to_string();
    let (jar, messages) = Flash::read(&jar).take(jar);
    Ok((
        jar,
        views::profile_page(&messages, &user.email, &member_since),
    )
        .into_response())
}

/// The lone role-gated page. There is no way to hold the admin role, so it
/// always renders the forbidden page.
async fn admin() -> Response {
    (StatusCode::FORBIDDEN, views::forbidden_page()).into_response()
}
