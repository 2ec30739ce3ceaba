use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::flash::Flash;
use crate::sessions::SESSION_COOKIE;
use crate::state::AppState;

/// The identity a request's session cookie resolved to.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    /// Plaintext cookie token, kept so logout can revoke this session.
    pub token: String,
}

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<SessionUser> {
    let jar = CookieJar::from_headers(&parts.headers);
    let token = jar.get(SESSION_COOKIE)?.value().to_string();
    let user_id = state.sessions.resolve(&token)?;
    Some(SessionUser { user_id, token })
}

/// Optional identity for pages anyone may view. Never rejects; anonymous
/// requests extract as `MaybeUser(None)`.
pub struct MaybeUser(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(session_from_parts(parts, state)))
    }
}

/// Guard for protected pages. An unauthenticated request is redirected to
/// the login page with the originally requested path carried as `next`, so
/// a following login lands where the user meant to go.
pub struct RequireUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match session_from_parts(parts, state) {
            Some(session) => Ok(RequireUser(session)),
            None => {
                let original = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                tracing::debug!(path = %original, "unauthenticated request sent to login");
                let location =
                    format!("/users/login?next={}", urlencoding::encode(original));
                let jar = CookieJar::from_headers(&parts.headers);
                let mut flash = Flash::read(&jar);
                flash.info("Please log in to access this page.");
                Err(flash.redirect(jar, &location))
            }
        }
    }
}
