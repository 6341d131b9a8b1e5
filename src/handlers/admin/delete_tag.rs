use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    dto::responses::{
        action_result::ActionResult, admin::delete_tag_response::DeleteTagResponse,
        response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::tag_service,
    util::time::now::tokio_now,
};

/// Posts keep existing; only their link to this tag goes away.
#[utoipa::path(
    delete,
    path = "/api/admin/tags/{tag_id}",
    tag = "admin",
    params(("tag_id" = i32, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag and its post links removed", body = ActionResult<DeleteTagResponse>),
        (status = 404, description = "No such tag", body = CodeErrorResp)
    )
)]
pub async fn delete_tag(
    State(state): State<Arc<ServerState>>,
    Path(tag_id): Path<i32>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let tag = tag_service::delete_tag(state.store(), tag_id).await?;

    let message = format!("Tag \"{}\" deleted", tag.tag_name);
    Ok(http_resp(
        ActionResult::success(
            message,
            DeleteTagResponse {
                deleted_tag_id: tag.tag_id,
                tag_name: tag.tag_name,
            },
        ),
        (),
        start,
    ))
}
