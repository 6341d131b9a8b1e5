use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    domain::{pagination::Page, user::UserProfile},
    dto::{requests::listing::AdminSearchQuery, responses::response_data::http_resp},
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::listing::list_users,
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    params(AdminSearchQuery),
    responses(
        (status = 200, description = "Users, oldest first; search matches username or email", body = Page<UserProfile>),
        (status = 400, description = "Invalid page or page_size", body = CodeErrorResp)
    )
)]
pub async fn admin_get_users(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<AdminSearchQuery>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let page = list_users(state.store(), query.page_request()?, query.search).await?;

    Ok(http_resp(page, (), start))
}
