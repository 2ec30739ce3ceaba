use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Level {
    /// CSS class hook used by the view layer.
    pub fn css_class(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

/// Notices that survive exactly one redirect, carried in a cookie.
///
/// A handler reads the incoming messages, may push more, and then either
/// renders a page (messages shown, cookie cleared) or redirects (messages
/// re-persisted for the next render). Messages raised and rendered in the
/// same request therefore appear immediately, matching classic
/// server-rendered flash behavior.
#[derive(Debug, Default)]
pub struct Flash {
    messages: Vec<Message>,
}

impl Flash {
    /// Decode the flash cookie, treating a missing or unreadable value as
    /// "no messages".
    pub fn read(jar: &CookieJar) -> Self {
        let messages = jar
            .get(FLASH_COOKIE)
            .map(|cookie| decode(cookie.value()))
            .unwrap_or_default();
        Self { messages }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Level::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(Level::Error, text);
    }

    fn push(&mut self, level: Level, text: impl Into<String>) {
        self.messages.push(Message {
            level,
            text: text.into(),
        });
    }

    /// Consume the flash for a page render: the caller displays the returned
    /// messages and the cookie is cleared so they do not reappear.
    pub fn take(self, jar: CookieJar) -> (CookieJar, Vec<Message>) {
        let jar = if jar.get(FLASH_COOKIE).is_some() {
            jar.remove(Cookie::build(FLASH_COOKIE).path("/"))
        } else {
            jar
        };
        (jar, self.messages)
    }

    /// Consume the flash for a 302 redirect: pending messages ride the
    /// cookie to the next page render.
    pub fn redirect(self, jar: CookieJar, location: &str) -> Response {
        let jar = if self.messages.is_empty() {
            jar.remove(Cookie::build(FLASH_COOKIE).path("/"))
        } else {
            let cookie = Cookie::build((FLASH_COOKIE, encode(&self.messages)))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            jar.add(cookie)
        };
        (
            StatusCode::FOUND,
            jar,
            [(header::LOCATION, location.to_string())],
        )
            .into_response()
    }
}

fn encode(messages: &[Message]) -> String {
    let json = serde_json::to_vec(messages).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode(value: &str) -> Vec<Message> {
    URL_SAFE_NO_PAD
        .decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let messages = vec![
            Message {
                level: Level::Success,
                text: "Thanks for registering, siri@email.com!".into(),
            },
            Message {
                level: Level::Error,
                text: "ERROR! Incorrect login credentials.".into(),
            },
        ];
        assert_eq!(decode(&encode(&messages)), messages);
    }

    #[test]
    fn garbage_cookie_value_decodes_to_empty() {
        assert!(decode("not base64 at all!").is_empty());
        assert!(decode(&URL_SAFE_NO_PAD.encode(b"{not json")).is_empty());
    }

    #[test]
    fn redirect_carries_messages_and_302() {
        let mut flash = Flash::default();
        flash.info("Goodbye!");
        let response = flash.redirect(CookieJar::new(), "/");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("flash cookie should be set")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("flash="));
    }

    #[test]
    fn take_clears_the_cookie_and_returns_messages() {
        let jar = CookieJar::new().add(
            Cookie::build((
                FLASH_COOKIE,
                encode(&[Message {
                    level: Level::Info,
                    text: "Already logged in!".into(),
                }]),
            ))
            .path("/"),
        );

        let flash = Flash::read(&jar);
        let (jar, messages) = flash.take(jar);

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "Already logged in!");
        // The jar now carries a removal cookie for the flash name.
        let removal = jar.get(FLASH_COOKIE);
        assert!(removal.is_none() || removal.unwrap().value().is_empty());
    }
}
