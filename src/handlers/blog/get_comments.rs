use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::{blog::comment::CommentDetails, pagination::Page},
    dto::{requests::listing::PageQuery, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::comment_service,
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/v1/posts/{post_id}/comments",
    tag = "comments",
    params(("post_id" = Uuid, Path, description = "Post id"), PageQuery),
    responses(
        (status = 200, description = "Comments on the post, newest first", body = Page<CommentDetails>),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn get_comments(
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let page =
        comment_service::list_post_comments(state.store(), post_id, query.page_request()?).await?;

    Ok(http_resp(page, (), start))
}
