use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::{control, error::ErrorResponse, satellites, scene};

#[derive(OpenApi)]
#[openapi(
    paths(
        satellites::status,
        satellites::trajectory,
        satellites::sensor,
        satellites::nearest,
        satellites::apply_result,
        satellites::clear,
        control::push_event,
        control::keyboard,
        scene::scene,
        scene::clock,
        scene::sites,
    ),
    components(
        schemas(
            ErrorResponse,
            satellites::ExternalResult,
            control::KeyboardInput,
            control::Queued,
            crate::animator::AnimatorStatus,
            crate::animator::SatelliteStatus,
            crate::animator::FlightState,
            crate::animator::ControlEvent,
            crate::animator::ControlKey,
            crate::animator::ControlKeys,
            crate::animator::SceneSnapshot,
            crate::animator::CameraFlight,
            crate::animator::EntityTransform,
            crate::animator::SensorCone,
            crate::animator::Cartesian3,
            crate::animator::Quaternion,
            crate::animator::SimulationClock,
            crate::calibration::CalibrationSite,
            crate::calibration::SiteLink,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Sat-Animator API",
        description = "Two-satellite trajectory animation: state, control and scene output",
        version = "0.1.0"
    ),
    tags(
        (name = "satellites", description = "Flight state, trails and sensor geometry"),
        (name = "control", description = "Manual control input"),
        (name = "scene", description = "Renderer output and reference data")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
