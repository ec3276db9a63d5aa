use serde::Serialize;
use utoipa::ToSchema;

// WGS-84
const SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;
const ECCENTRICITY_SQ: f64 = 0.006_694_379_990_14;

/// Earth-fixed cartesian position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Cartesian3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian3 {
    pub const ZERO: Cartesian3 = Cartesian3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Geodetic degrees/meters to ECEF meters.
    pub fn from_degrees(longitude_deg: f64, latitude_deg: f64, altitude_m: f64) -> Self {
        let lat = latitude_deg.to_radians();
        let lon = longitude_deg.to_radians();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = SEMI_MAJOR_AXIS_M / (1.0 - ECCENTRICITY_SQ * sin_lat * sin_lat).sqrt();
        Self {
            x: (n + altitude_m) * cos_lat * lon.cos(),
            y: (n + altitude_m) * cos_lat * lon.sin(),
            z: (n * (1.0 - ECCENTRICITY_SQ) + altitude_m) * sin_lat,
        }
    }

    pub fn distance(&self, other: &Cartesian3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn lerp(&self, other: &Cartesian3, t: f64) -> Cartesian3 {
        Cartesian3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }
}

/// Unit quaternion, scalar last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> Self {
        let half = angle / 2.0;
        let s = half.sin();
        Self {
            x: axis[0] * s,
            y: axis[1] * s,
            z: axis[2] * s,
            w: half.cos(),
        }
    }

    /// Heading is measured clockwise from north, pitch and roll about the
    /// body axes, matching the renderer's convention.
    pub fn from_heading_pitch_roll(heading: f64, pitch: f64, roll: f64) -> Self {
        let roll_q = Self::from_axis_angle([1.0, 0.0, 0.0], roll);
        let pitch_q = Self::from_axis_angle([0.0, 1.0, 0.0], -pitch);
        let heading_q = Self::from_axis_angle([0.0, 0.0, 1.0], -heading);
        heading_q.mul(&pitch_q).mul(&roll_q)
    }

    /// Row-major rotation matrix to quaternion (Shepperd).
    pub fn from_rotation_matrix(m: [[f64; 3]; 3]) -> Self {
        let trace = m[0][0] + m[1][1] + m[2][2];
        if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            Self {
                w: 0.25 / s,
                x: (m[2][1] - m[1][2]) * s,
                y: (m[0][2] - m[2][0]) * s,
                z: (m[1][0] - m[0][1]) * s,
            }
        } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
            let s = 2.0 * (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt();
            Self {
                w: (m[2][1] - m[1][2]) / s,
                x: 0.25 * s,
                y: (m[0][1] + m[1][0]) / s,
                z: (m[0][2] + m[2][0]) / s,
            }
        } else if m[1][1] > m[2][2] {
            let s = 2.0 * (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt();
            Self {
                w: (m[0][2] - m[2][0]) / s,
                x: (m[0][1] + m[1][0]) / s,
                y: 0.25 * s,
                z: (m[1][2] + m[2][1]) / s,
            }
        } else {
            let s = 2.0 * (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt();
            Self {
                w: (m[1][0] - m[0][1]) / s,
                x: (m[0][2] + m[2][0]) / s,
                y: (m[1][2] + m[2][1]) / s,
                z: 0.25 * s,
            }
        }
    }

    pub fn mul(&self, rhs: &Quaternion) -> Quaternion {
        Quaternion {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn rotate(&self, v: [f64; 3]) -> [f64; 3] {
        let u = [self.x, self.y, self.z];
        let t = scale(cross(u, v), 2.0);
        let c = cross(u, t);
        [
            v[0] + self.w * t[0] + c[0],
            v[1] + self.w * t[1] + c[1],
            v[2] + self.w * t[2] + c[2],
        ]
    }
}

/// East, north and up unit vectors of the local frame at a geodetic point.
pub fn enu_axes(latitude_deg: f64, longitude_deg: f64) -> ([f64; 3], [f64; 3], [f64; 3]) {
    let lat = latitude_deg.to_radians();
    let lon = longitude_deg.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    let east = [-sin_lon, cos_lon, 0.0];
    let north = [-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat];
    let up = [cos_lat * cos_lon, cos_lat * sin_lon, sin_lat];
    (east, north, up)
}

/// Earth-fixed orientation of a body at the given point with the given
/// attitude relative to its local east-north-up frame.
pub fn heading_pitch_roll_quaternion(
    latitude_deg: f64,
    longitude_deg: f64,
    heading: f64,
    pitch: f64,
    roll: f64,
) -> Quaternion {
    let (east, north, up) = enu_axes(latitude_deg, longitude_deg);
    let frame = Quaternion::from_rotation_matrix([
        [east[0], north[0], up[0]],
        [east[1], north[1], up[1]],
        [east[2], north[2], up[2]],
    ]);
    frame.mul(&Quaternion::from_heading_pitch_roll(heading, pitch, roll))
}

/// Shortest signed angular distance from `from` to `to`, in (-pi, pi].
pub fn shortest_angle(from: f64, to: f64) -> f64 {
    let delta = to - from;
    delta.sin().atan2(delta.cos())
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn scale(v: [f64; 3], k: f64) -> [f64; 3] {
    [v[0] * k, v[1] * k, v[2] * k]
}
