use axum_extra::extract::cookie::{Cookie, SameSite};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token_cookie";
const BEARER_PREFIX: &str = "Bearer ";

fn non_empty(token: &str) -> Option<&str> {
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn strip_bearer(value: &str) -> Option<&str> {
    non_empty(value.trim().strip_prefix(BEARER_PREFIX)?)
}

/// The cookie prefix is optional; a bare value is the token itself.
fn cookie_token(value: &str) -> Option<&str> {
    let value = value.trim();
    match value.strip_prefix(BEARER_PREFIX) {
        Some(token) => non_empty(token),
        None => non_empty(value),
    }
}

/// Picks the access token from the auth cookie, falling back to the
/// `Authorization: Bearer <token>` header.
pub fn extract_bearer<'a>(cookie: Option<&'a str>, header: Option<&'a str>) -> Option<&'a str> {
    cookie
        .and_then(cookie_token)
        .or_else(|| header.and_then(strip_bearer))
}

pub fn bearer_value(token: &str) -> String {
    format!("{BEARER_PREFIX}{token}")
}

pub fn access_token_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, bearer_value(token)))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Matches the path of [`access_token_cookie`] so browsers drop it.
pub fn expired_access_token_cookie() -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, "")).path("/").build()
}
