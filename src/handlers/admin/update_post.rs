use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::blog::post::PostDetails,
    dto::{
        requests::admin::admin_update_post_request::AdminUpdatePostRequest,
        responses::{action_result::ActionResult, response_data::http_resp},
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::post_service,
    util::time::now::tokio_now,
};

/// A `post_tags` list replaces every tag on the post; leave it out to keep them.
#[utoipa::path(
    patch,
    path = "/api/admin/posts/{post_id}",
    tag = "admin",
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body = AdminUpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = ActionResult<PostDetails>),
        (status = 400, description = "Empty title or content", body = CodeErrorResp),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn admin_update_post(
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<AdminUpdatePostRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let previous_image = match request.post.post_featured_image_url {
        Some(_) => {
            post_service::get_post(state.store(), post_id)
                .await?
                .details
                .post
                .post_featured_image_url
        }
        None => None,
    };

    let details = post_service::admin_update_post(state.store(), post_id, request.into()).await?;

    if previous_image != details.post.post_featured_image_url {
        state.files().discard(previous_image.as_deref()).await;
    }

    let message = format!("Post \"{}\" updated", details.post.post_title);
    Ok(http_resp(ActionResult::success(message, details), (), start))
}
