use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::{debug, warn};

use crate::{
    init::state::ServerState,
    services::user_service,
    util::auth::{
        access::{AuthStatus, Identity},
        bearer::{ACCESS_TOKEN_COOKIE, extract_bearer},
    },
};

/// Resolves the caller from the access token cookie or `Authorization`
/// header and attaches an [`AuthStatus`]. Never rejects; anything that does
/// not check out leaves the request logged out.
pub async fn auth_middleware(
    State(state): State<Arc<ServerState>>,
    cookie_jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token: Option<String> = {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let cookie = cookie_jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value());
        extract_bearer(cookie, header).map(str::to_owned)
    };

    let auth_status = match token {
        Some(token) => resolve(&state, &token).await,
        None => AuthStatus::LoggedOut,
    };

    request.extensions_mut().insert(auth_status);

    next.run(request).await
}

async fn resolve(state: &ServerState, token: &str) -> AuthStatus {
    let Some(user_name) = state.tokens().subject(token) else {
        return AuthStatus::LoggedOut;
    };

    match user_service::find_by_username(state.store(), &user_name).await {
        Ok(Some(user)) => AuthStatus::LoggedIn(Identity::from(&user)),
        Ok(None) => {
            debug!(user_name, "Token subject no longer exists");
            AuthStatus::LoggedOut
        }
        Err(e) => {
            warn!(error = %e, "Could not resolve token subject");
            AuthStatus::LoggedOut
        }
    }
}
