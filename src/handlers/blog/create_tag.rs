use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    domain::blog::tag::Tag,
    dto::{requests::blog::tag_name_request::TagNameRequest, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::tag_service,
    util::time::now::tokio_now,
};

/// Idempotent: an existing tag with the same normalized name is returned as is.
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    tag = "tags",
    request_body = TagNameRequest,
    responses(
        (status = 200, description = "The tag carrying that name", body = Tag),
        (status = 400, description = "Blank tag name", body = CodeErrorResp)
    )
)]
pub async fn create_tag(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<TagNameRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let tag = tag_service::create_tag(state.store(), &request.tag_name).await?;

    Ok(http_resp(tag, (), start))
}
