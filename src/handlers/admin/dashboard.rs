use std::sync::Arc;

use axum::{extract::State, response::IntoResponse};

use crate::{
    dto::responses::response_data::http_resp,
    errors::code_error::{CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    services::dashboard_service::{self, DashboardStats},
    util::time::now::tokio_now,
};

#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "admin",
    responses(
        (status = 200, description = "Row counts per entity", body = DashboardStats),
        (status = 403, description = "Admin privileges required", body = CodeErrorResp)
    )
)]
pub async fn get_dashboard(
    State(state): State<Arc<ServerState>>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let stats = dashboard_service::dashboard(state.store()).await?;

    Ok(http_resp(stats, (), start))
}
