use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    domain::blog::tag::Tag,
    dto::{requests::listing::PageQuery, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::tag_service,
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tag = "tags",
    params(PageQuery),
    responses(
        (status = 200, description = "Tags ordered by name", body = Vec<Tag>),
        (status = 400, description = "Invalid page or page_size", body = CodeErrorResp)
    )
)]
pub async fn get_tags(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PageQuery>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let tags = tag_service::list_tags(state.store(), query.page_request()?).await?;

    Ok(http_resp(tags, (), start))
}
