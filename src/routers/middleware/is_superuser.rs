use axum::{body::Body, extract::Request, middleware::Next, response::IntoResponse};

use crate::{
    errors::code_error::HandlerResponse,
    util::auth::access::{AuthStatus, require_admin},
};

/// Admin routes: active administrators only. Same extension contract as
/// `is_logged_in_middleware`.
pub async fn is_superuser_middleware(
    mut request: Request<Body>,
    next: Next,
) -> HandlerResponse<impl IntoResponse> {
    let auth_status = request
        .extensions()
        .get::<AuthStatus>()
        .cloned()
        .unwrap_or(AuthStatus::LoggedOut);

    let identity = require_admin(&auth_status)?.clone();
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
