use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::Query;

use crate::{
    domain::{blog::post::PostDetails, pagination::Page},
    dto::{requests::listing::AdminPostsQuery, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::listing::{PostListing, list_posts},
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/admin/posts",
    tag = "admin",
    params(AdminPostsQuery),
    responses(
        (status = 200, description = "Posts, newest first", body = Page<PostDetails>),
        (status = 400, description = "Invalid page or page_size", body = CodeErrorResp)
    )
)]
pub async fn admin_get_posts(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<AdminPostsQuery>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let page_request = query.page_request()?;
    let listing = PostListing {
        search: query.search,
        tags: query.tags,
        owner_id: query.author_id,
        ..PostListing::new(page_request)
    };
    let page = list_posts(state.store(), listing).await?;

    Ok(http_resp(page, (), start))
}
