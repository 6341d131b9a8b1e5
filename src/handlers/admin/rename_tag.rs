use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    domain::blog::tag::Tag,
    dto::{
        requests::blog::tag_name_request::TagNameRequest,
        responses::{action_result::ActionResult, response_data::http_resp},
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::tag_service::{self, RenameOutcome},
    util::time::now::tokio_now,
};

#[utoipa::path(
    patch,
    path = "/api/admin/tags/{tag_id}",
    tag = "admin",
    params(("tag_id" = i32, Path, description = "Tag id")),
    request_body = TagNameRequest,
    responses(
        (status = 200, description = "Renamed, or unchanged when the normalized name already matched", body = ActionResult<Tag>),
        (status = 400, description = "Blank tag name", body = CodeErrorResp),
        (status = 404, description = "No such tag", body = CodeErrorResp),
        (status = 409, description = "Another tag already has that name", body = CodeErrorResp)
    )
)]
pub async fn rename_tag(
    State(state): State<Arc<ServerState>>,
    Path(tag_id): Path<i32>,
    Json(request): Json<TagNameRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let result = match tag_service::rename_tag(state.store(), tag_id, &request.tag_name).await? {
        RenameOutcome::Renamed(tag) => {
            ActionResult::success(format!("Tag renamed to \"{}\"", tag.tag_name), tag)
        }
        RenameOutcome::Unchanged(tag) => {
            ActionResult::info(format!("Tag is already named \"{}\"", tag.tag_name), tag)
        }
    };

    Ok(http_resp(result, (), start))
}
