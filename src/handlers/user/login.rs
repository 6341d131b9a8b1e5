use std::sync::Arc;

use axum::{Form, extract::State, response::IntoResponse};
use tracing::info;

use crate::{
    dto::{
        requests::user::login_form::LoginForm,
        responses::{auth::token_response::TokenResponse, response_data::http_resp_with_cookies},
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::ServerState,
    services::user_service,
    util::{auth::bearer::access_token_cookie, time::now::tokio_now},
};

#[utoipa::path(
    post,
    path = "/api/v1/login/token",
    tag = "users",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token issued and cookie set", body = TokenResponse),
        (status = 401, description = "Incorrect username or password", body = CodeErrorResp)
    )
)]
pub async fn login(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<LoginForm>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let user = user_service::authenticate(state.store(), &form.username, &form.password).await?;

    let token = state
        .tokens()
        .issue(&user.user_name)
        .map_err(|e| code_err(CodeError::CREDENTIAL_ERROR, e))?;

    let cookie = access_token_cookie(&token, state.config().cookie_secure);

    info!(user_id = %user.user_id, "User logged in");

    Ok(http_resp_with_cookies(
        TokenResponse::bearer(token),
        (),
        start,
        Some(vec![cookie]),
        None,
    ))
}
