use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::blog::comment::CommentDetails,
    dto::{
        requests::blog::create_comment_request::CreateCommentRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::comment_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

#[utoipa::path(
    post,
    path = "/api/v1/posts/{post_id}/comments",
    tag = "comments",
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Created comment", body = CommentDetails),
        (status = 400, description = "Empty or over-long comment", body = CodeErrorResp),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn submit_comment(
    Extension(identity): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<CreateCommentRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let details = comment_service::create_comment(
        state.store(),
        identity.user_id,
        post_id,
        &request.comment_content,
    )
    .await?;

    Ok(http_resp(details, (), start))
}
