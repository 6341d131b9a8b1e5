use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    domain::{blog::comment::CommentDetails, pagination::Page},
    dto::{requests::listing::AdminCommentsQuery, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::listing::{CommentListing, list_comments},
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/admin/comments",
    tag = "admin",
    params(AdminCommentsQuery),
    responses(
        (status = 200, description = "Comments, newest first", body = Page<CommentDetails>),
        (status = 400, description = "Invalid page or page_size", body = CodeErrorResp)
    )
)]
pub async fn admin_get_comments(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<AdminCommentsQuery>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let page_request = query.page_request()?;
    let listing = CommentListing {
        search: query.search,
        owner_id: query.author_id,
        post_id: query.post_id,
        ..CommentListing::new(page_request)
    };
    let page = list_comments(state.store(), listing).await?;

    Ok(http_resp(page, (), start))
}
