use axum::{body::Body, extract::Request, middleware::Next, response::IntoResponse};

use crate::{
    errors::code_error::HandlerResponse,
    util::auth::access::{AuthStatus, require_active},
};

/// Lets only active, logged-in users through and hands the handler their
/// [`Identity`](crate::util::auth::access::Identity) as an extension.
///
/// Runs after `auth_middleware`.
pub async fn is_logged_in_middleware(
    mut request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let auth_status = request
        .extensions()
        .get::<AuthStatus>()
        .cloned()
        .unwrap_or(AuthStatus::LoggedOut);

    let identity = require_active(&auth_status)?.clone();
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
