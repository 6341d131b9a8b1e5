use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    domain::blog::post::PostDetails,
    dto::{
        requests::blog::update_post_request::UpdatePostRequest,
        responses::response_data::http_resp,
    },
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::post_service,
    util::{auth::access::Identity, time::now::tokio_now},
};

#[utoipa::path(
    put,
    path = "/api/v1/posts/{post_id}",
    tag = "posts",
    params(("post_id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostDetails),
        (status = 403, description = "Caller does not own the post", body = CodeErrorResp),
        (status = 404, description = "No such post", body = CodeErrorResp)
    )
)]
pub async fn update_post(
    Extension(identity): Extension<Identity>,
    State(state): State<Arc<ServerState>>,
    Path(post_id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let details = post_service::update_post_as_owner(
        state.store(),
        identity.user_id,
        post_id,
        request.into(),
    )
    .await?;

    Ok(http_resp(details, (), start))
}
