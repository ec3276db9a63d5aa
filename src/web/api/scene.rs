use axum::{extract::State, Json};

use crate::animator::{SceneSnapshot, SimulationClock};
use crate::calibration::CalibrationSite;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::auth::Operator;
use crate::web::config::Permission;
use crate::web::server::AppState;

#[utoipa::path(
    get,
    path = "/api/scene",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Latest entity transforms and camera request", body = SceneSnapshot),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "scene"
)]
pub async fn scene(
    State(state): State<AppState>,
    operator: Operator,
) -> ApiResult<Json<SceneSnapshot>> {
    operator.require(Permission::ViewState)?;
    Ok(Json(state.animator.lock().await.scene()))
}

#[utoipa::path(
    get,
    path = "/api/clock",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Simulation clock", body = SimulationClock),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "scene"
)]
pub async fn clock(
    State(state): State<AppState>,
    operator: Operator,
) -> ApiResult<Json<SimulationClock>> {
    operator.require(Permission::ViewState)?;
    Ok(Json(state.animator.lock().await.status().clock))
}

#[utoipa::path(
    get,
    path = "/api/sites",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Calibration sites", body = Vec<CalibrationSite>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "scene"
)]
pub async fn sites(
    State(state): State<AppState>,
    operator: Operator,
) -> ApiResult<Json<Vec<CalibrationSite>>> {
    operator.require(Permission::ViewState)?;
    Ok(Json(state.config.sites.clone()))
}
