use std::sync::Arc;

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    domain::blog::post::PostDetails,
    dto::{
        requests::blog::create_post_request::CreatePostRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::post_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Created post with its tags", body = PostDetails),
        (status = 400, description = "Empty title or content", body = CodeErrorResp),
        (status = 401, description = "Not authenticated", body = CodeErrorResp)
    )
)]
pub async fn submit_post(
    Extension(identity): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Json(request): Json<CreatePostRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let details = post_service::create_post(state.store(), identity.user_id, request.into()).await?;

    Ok(http_resp(details, (), start))
}
