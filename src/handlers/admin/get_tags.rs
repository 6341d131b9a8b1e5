use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    domain::{blog::tag::TagWithCount, pagination::Page},
    dto::{requests::listing::AdminSearchQuery, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::listing::list_tags_with_counts,
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/admin/tags",
    tag = "admin",
    params(AdminSearchQuery),
    responses(
        (status = 200, description = "Tags by name with post counts, unused tags included", body = Page<TagWithCount>),
        (status = 400, description = "Invalid page or page_size", body = CodeErrorResp)
    )
)]
pub async fn admin_get_tags(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<AdminSearchQuery>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let page = list_tags_with_counts(state.store(), query.page_request()?, query.search).await?;

    Ok(http_resp(page, (), start))
}
