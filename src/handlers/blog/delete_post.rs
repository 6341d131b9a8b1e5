use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    dto::responses::{blog::delete_post_response::DeletePostResponse, response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::post_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post, its comments and tag links removed", body = DeletePostResponse),
        (status = 403, description = "Caller does not own the post", body = CodeErrorResp),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn delete_post(
    Extension(identity): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let post = post_service::delete_post_as_owner(state.store(), identity.user_id, post_id).await?;

    state
        .files()
        .discard(post.post_featured_image_url.as_deref())
        .await;

    Ok(http_resp(
        DeletePostResponse {
            deleted_post_id: post.post_id,
        },
        (),
        start,
    ))
}
