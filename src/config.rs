//! Operator settings.
//!
//! [`PlanarizeSettings`] is passed by reference into
//! [`planarize_selection`](crate::planarize::planarize_selection). It derives
//! serde so a host can persist it alongside its scene; missing fields take
//! their defaults.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshFlattenError;

/// How the reference plane is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneMode {
    /// Least-squares plane through all selected vertices.
    #[default]
    BestFit,
    /// Normal and median center of the active face.
    ActiveFace,
    /// Area-weighted mean of the selected face normals through the vertex centroid.
    Average,
}

/// Settings for "planarize and rebuild selection as one face".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarizeSettings {
    pub plane_mode: PlaneMode,
    /// Merge near-duplicate vertices before extracting the boundary.
    pub weld_boundary: bool,
    /// Merge tolerance; `0` disables the weld.
    pub weld_distance: f64,
    /// Dissolve boundary vertices that are collinear with their neighbours.
    pub simplify_boundary: bool,
    /// Collinearity tolerance in degrees; `0` disables simplification.
    pub simplify_angle_deg: f64,
    /// With several boundary loops keep the largest and fill the others.
    pub keep_largest_loop: bool,
    /// Re-orient the new face against its neighbours.
    pub recalc_normals: bool,
}

impl Default for PlanarizeSettings {
    fn default() -> Self {
        Self {
            plane_mode: PlaneMode::BestFit,
            weld_boundary: true,
            weld_distance: 1e-4,
            simplify_boundary: false,
            simplify_angle_deg: 0.2,
            keep_largest_loop: true,
            recalc_normals: true,
        }
    }
}

impl PlanarizeSettings {
    /// Accepted values of [`PlanarizeSettings::weld_distance`].
    pub const WELD_DISTANCE_RANGE: RangeInclusive<f64> = 0.0..=0.1;
    /// Accepted values of [`PlanarizeSettings::simplify_angle_deg`].
    pub const SIMPLIFY_ANGLE_RANGE: RangeInclusive<f64> = 0.0..=5.0;

    /// Rejects out-of-range or NaN tolerances.
    pub fn validate(&self) -> Result<(), MeshFlattenError> {
        check_range("weld_distance", self.weld_distance, Self::WELD_DISTANCE_RANGE)?;
        check_range(
            "simplify_angle_deg",
            self.simplify_angle_deg,
            Self::SIMPLIFY_ANGLE_RANGE,
        )
    }

    /// Whether the weld stage runs.
    pub fn weld_enabled(&self) -> bool {
        self.weld_boundary && self.weld_distance > 0.0
    }

    /// Whether the simplification stage runs.
    pub fn simplify_enabled(&self) -> bool {
        self.simplify_boundary && self.simplify_angle_deg > 0.0
    }

    /// Simplification tolerance in radians.
    pub fn simplify_angle_rad(&self) -> f64 {
        self.simplify_angle_deg.to_radians()
    }
}

fn check_range(
    name: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), MeshFlattenError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(MeshFlattenError::InvalidSetting {
            name,
            reason: format!(
                "{value} is outside [{}, {}]",
                range.start(),
                range.end()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = PlanarizeSettings::default();
        settings.validate().unwrap();
        assert!(settings.weld_enabled());
        assert!(!settings.simplify_enabled());
        assert!((settings.simplify_angle_rad() - 0.2_f64.to_radians()).abs() < 1e-15);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let settings = PlanarizeSettings {
            weld_distance: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(MeshFlattenError::InvalidSetting { name: "weld_distance", .. })
        ));

        let settings = PlanarizeSettings {
            simplify_angle_deg: f64::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn zero_tolerances_disable_stages() {
        let settings = PlanarizeSettings {
            weld_distance: 0.0,
            simplify_boundary: true,
            simplify_angle_deg: 0.0,
            ..Default::default()
        };
        settings.validate().unwrap();
        assert!(!settings.weld_enabled());
        assert!(!settings.simplify_enabled());
    }

    #[test]
    fn partial_json_takes_defaults() {
        let settings: PlanarizeSettings =
            serde_json::from_str(r#"{"plane_mode": "active_face", "weld_boundary": false}"#)
                .unwrap();
        assert_eq!(settings.plane_mode, PlaneMode::ActiveFace);
        assert!(!settings.weld_boundary);
        assert_eq!(settings.weld_distance, 1e-4);
        assert!(settings.keep_largest_loop);
    }
}
