use super::geodesy::{heading_pitch_roll_quaternion, Cartesian3};
use super::types::{FlightState, SensorCone};

pub const SENSOR_HALF_ANGLE_DEG: f64 = 45.0;

/// Sensor footprint cone between a satellite and its ground point.
///
/// The cone is centred halfway along the line of sight, spans the full
/// satellite-to-ground distance and opens to `tan(half_angle) * distance` at
/// the ground. Coincident points give a unit cone.
pub fn compute_sensor_cone(
    satellite: &Cartesian3,
    ground: &Cartesian3,
    flight: &FlightState,
) -> SensorCone {
    let distance = satellite.distance(ground);
    let orientation = heading_pitch_roll_quaternion(
        flight.latitude_deg,
        flight.longitude_deg,
        flight.heading,
        flight.pitch,
        flight.roll,
    );

    if distance == 0.0 {
        return SensorCone {
            origin: *satellite,
            orientation,
            length: 1.0,
            top_radius: 0.0,
            bottom_radius: 1.0,
            visible: true,
        };
    }

    SensorCone {
        origin: satellite.lerp(ground, 0.5),
        orientation,
        length: distance,
        top_radius: 0.0,
        bottom_radius: SENSOR_HALF_ANGLE_DEG.to_radians().tan() * distance,
        visible: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_spans_line_of_sight() {
        let flight = FlightState::at(30.0, 120.0, 2000.0);
        let cone = compute_sensor_cone(&flight.position(), &flight.ground_position(), &flight);

        assert!((cone.length - 2000.0).abs() < 1e-6);
        assert!((cone.bottom_radius - 2000.0).abs() < 1e-6);
        assert_eq!(cone.top_radius, 0.0);

        let mid = Cartesian3::from_degrees(120.0, 30.0, 1000.0);
        assert!(cone.origin.distance(&mid) < 1e-6);
    }

    #[test]
    fn test_coincident_points_give_unit_cone() {
        let flight = FlightState::at(0.0, 0.0, 0.0);
        let p = flight.position();
        let cone = compute_sensor_cone(&p, &p, &flight);
        assert_eq!(cone.length, 1.0);
        assert_eq!(cone.bottom_radius, 1.0);
    }
}
