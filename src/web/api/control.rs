use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::animator::ControlEvent;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::auth::Operator;
use crate::web::config::Permission;
use crate::web::server::AppState;

/// Raw keyboard input as the browser reports it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct KeyboardInput {
    pub key: String,
    pub pressed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Queued {
    pub queued: bool,
}

#[utoipa::path(
    post,
    path = "/api/control/events",
    request_body = ControlEvent,
    security(("api_key" = [])),
    responses(
        (status = 202, description = "Event queued for the next tick", body = Queued),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "control"
)]
pub async fn push_event(
    State(state): State<AppState>,
    operator: Operator,
    Json(event): Json<ControlEvent>,
) -> ApiResult<(StatusCode, Json<Queued>)> {
    operator.require(Permission::ControlSatellites)?;
    state.animator.lock().await.push_event(event);
    Ok((StatusCode::ACCEPTED, Json(Queued { queued: true })))
}

#[utoipa::path(
    post,
    path = "/api/control/keyboard",
    request_body = KeyboardInput,
    security(("api_key" = [])),
    responses(
        (status = 202, description = "Key mapped and queued, or ignored if unbound", body = Queued),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "control"
)]
pub async fn keyboard(
    State(state): State<AppState>,
    operator: Operator,
    Json(input): Json<KeyboardInput>,
) -> ApiResult<(StatusCode, Json<Queued>)> {
    operator.require(Permission::ControlSatellites)?;

    let event = if input.pressed {
        ControlEvent::from_key_down(&input.key)
    } else {
        ControlEvent::from_key_up(&input.key)
    };

    let queued = match event {
        Some(event) => {
            state.animator.lock().await.push_event(event);
            true
        }
        None => false,
    };
    Ok((StatusCode::ACCEPTED, Json(Queued { queued })))
}
