use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::animator::Cartesian3;

/// Sites further than this from a ground point are not linked to it.
pub const MAX_LINK_DISTANCE_M: f64 = 3_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalibrationSite {
    pub id: u32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl CalibrationSite {
    pub fn position(&self) -> Cartesian3 {
        Cartesian3::from_degrees(self.lng, self.lat, 0.0)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SiteLink {
    pub site: CalibrationSite,
    pub distance_m: f64,
}

pub fn default_sites() -> Vec<CalibrationSite> {
    [(5, 40.18, 94.27), (7, 40.14, 89.12), (2, 24.42, 13.35)]
        .into_iter()
        .map(|(id, lat, lng)| CalibrationSite {
            id,
            name: format!("Calibration Site {}", id),
            lat,
            lng,
        })
        .collect()
}

/// Closest site to `ground` within [`MAX_LINK_DISTANCE_M`].
pub fn nearest_site(sites: &[CalibrationSite], ground: &Cartesian3) -> Option<SiteLink> {
    sites
        .iter()
        .map(|site| (site, site.position().distance(ground)))
        .filter(|(_, distance)| *distance < MAX_LINK_DISTANCE_M)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(site, distance_m)| SiteLink {
            site: site.clone(),
            distance_m,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_closest_site() {
        let sites = default_sites();
        let ground = Cartesian3::from_degrees(90.0, 40.0, 0.0);
        let link = nearest_site(&sites, &ground).unwrap();
        assert_eq!(link.site.id, 7);
        assert!(link.distance_m < 200_000.0);
    }

    #[test]
    fn test_far_point_has_no_link() {
        let sites = default_sites();
        let ground = Cartesian3::from_degrees(-120.0, -40.0, 0.0);
        assert!(nearest_site(&sites, &ground).is_none());
        assert!(nearest_site(&[], &ground).is_none());
    }
}
