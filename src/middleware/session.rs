use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::debug;

pub const SESSION_COOKIE: &str = "showroom_session";
pub const SESSION_LIFETIME_MINUTES: i64 = 30;

/// Payload stored (encrypted) in the session cookie.
#[derive(Debug, Serialize, Deserialize)]
struct SessionData {
    user: String,
    /// Unix seconds.
    expires_at: i64,
}

/// Logged-in admin. Extracting it from a request without a valid session
/// short-circuits with a redirect to `/login`.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        match session_user(&jar) {
            Some(username) => Ok(Self { username }),
            None => {
                debug!(path = %parts.uri.path(), "no admin session; redirecting to login");
                Err(Redirect::to("/login"))
            }
        }
    }
}

/// Username of the current session, if the cookie decrypts and has not expired.
pub fn session_user(jar: &PrivateCookieJar) -> Option<String> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let data: SessionData = serde_json::from_str(cookie.value()).ok()?;
    (data.expires_at > Utc::now().timestamp()).then_some(data.user)
}

/// Replace whatever session exists with a fresh one for `username`.
pub fn start_session(jar: PrivateCookieJar, username: &str, secure: bool) -> PrivateCookieJar {
    let data = SessionData {
        user: username.to_string(),
        expires_at: Utc::now().timestamp() + SESSION_LIFETIME_MINUTES * 60,
    };
    // serializing two plain fields cannot fail
    let value = serde_json::to_string(&data).unwrap_or_default();
    jar.add(build_cookie(value, secure))
}

pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie())
}

fn build_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(SESSION_LIFETIME_MINUTES))
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::generate())
    }

    #[test]
    fn started_session_is_readable() {
        let jar = start_session(jar(), "admin", true);
        assert_eq!(session_user(&jar).as_deref(), Some("admin"));
    }

    #[test]
    fn ended_session_is_gone() {
        let jar = end_session(start_session(jar(), "admin", false));
        assert!(session_user(&jar).is_none());
    }

    #[test]
    fn expired_session_is_rejected() {
        let expired = SessionData {
            user: "admin".to_string(),
            expires_at: Utc::now().timestamp() - 1,
        };
        let jar = jar().add(Cookie::new(
            SESSION_COOKIE,
            serde_json::to_string(&expired).unwrap(),
        ));
        assert!(session_user(&jar).is_none());
    }

    #[test]
    fn cookie_attributes() {
        let cookie = build_cookie("v".to_string(), true);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::minutes(30)));
    }
}
