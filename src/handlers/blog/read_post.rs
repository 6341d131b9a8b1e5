use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::blog::post::PostWithComments,
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::post_service,
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post with author, tags and comments", body = PostWithComments),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn read_post(
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let post = post_service::get_post(state.store(), post_id).await?;

    Ok(http_resp(post, (), start))
}
