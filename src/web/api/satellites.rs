use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::animator::{AnimatorStatus, Cartesian3, FlightState, SensorCone};
use crate::calibration::{nearest_site, SiteLink};
use crate::web::api::error::{satellite, ApiResult, ErrorResponse};
use crate::web::auth::Operator;
use crate::web::config::Permission;
use crate::web::server::AppState;

/// Attitude and time computed by an external optimiser.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExternalResult {
    pub time: DateTime<Utc>,
    /// Degrees.
    pub roll: f64,
    /// Degrees.
    pub pitch: f64,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Animator state", body = AnimatorStatus),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn status(
    State(state): State<AppState>,
    operator: Operator,
) -> ApiResult<Json<AnimatorStatus>> {
    operator.require(Permission::ViewState)?;
    let animator = state.animator.lock().await;
    Ok(Json(animator.status()))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{index}/trajectory",
    params(("index" = u8, Path, description = "Satellite index (0 or 1)")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Trailing path, oldest first", body = Vec<Cartesian3>),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn trajectory(
    State(state): State<AppState>,
    operator: Operator,
    Path(index): Path<u8>,
) -> ApiResult<Json<Vec<Cartesian3>>> {
    operator.require(Permission::ViewState)?;
    let index = satellite(index)?;
    let animator = state.animator.lock().await;
    Ok(Json(animator.trajectory(index)))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{index}/sensor",
    params(("index" = u8, Path, description = "Satellite index (0 or 1)")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Sensor cone geometry", body = SensorCone),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn sensor(
    State(state): State<AppState>,
    operator: Operator,
    Path(index): Path<u8>,
) -> ApiResult<Json<SensorCone>> {
    operator.require(Permission::ViewState)?;
    let index = satellite(index)?;
    let animator = state.animator.lock().await;
    Ok(Json(animator.sensor_cone(index)))
}

#[utoipa::path(
    get,
    path = "/api/satellites/{index}/nearest-site",
    params(("index" = u8, Path, description = "Satellite index (0 or 1)")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Nearest calibration site in range, if any", body = Option<SiteLink>),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn nearest(
    State(state): State<AppState>,
    operator: Operator,
    Path(index): Path<u8>,
) -> ApiResult<Json<Option<SiteLink>>> {
    operator.require(Permission::ViewState)?;
    let index = satellite(index)?;
    let ground = state.animator.lock().await.flight(index).ground_position();
    Ok(Json(nearest_site(&state.config.sites, &ground)))
}

#[utoipa::path(
    post,
    path = "/api/satellites/{index}/result",
    params(("index" = u8, Path, description = "Satellite index (0 or 1)")),
    request_body = ExternalResult,
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Satellite moved to the result", body = FlightState),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn apply_result(
    State(state): State<AppState>,
    operator: Operator,
    Path(index): Path<u8>,
    Json(request): Json<ExternalResult>,
) -> ApiResult<Json<FlightState>> {
    operator.require(Permission::ControlSatellites)?;
    let index = satellite(index)?;
    let animator = state.animator.lock().await;
    let flight = animator.apply_external_result(index, request.time, request.roll, request.pitch);
    Ok(Json(flight))
}

#[utoipa::path(
    post,
    path = "/api/satellites/{index}/clear",
    params(("index" = u8, Path, description = "Satellite index (0 or 1)")),
    security(("api_key" = [])),
    responses(
        (status = 200, description = "Trajectory cleared"),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Unknown satellite", body = ErrorResponse)
    ),
    tag = "satellites"
)]
pub async fn clear(
    State(state): State<AppState>,
    operator: Operator,
    Path(index): Path<u8>,
) -> ApiResult<()> {
    operator.require(Permission::ControlSatellites)?;
    let index = satellite(index)?;
    state.animator.lock().await.clear_trajectory(index);
    Ok(())
}
