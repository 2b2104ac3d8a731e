//! Analysis parameters: buffer radii and the projection calendar.

use serde::{Deserialize, Serialize};

/// Radii and period labels used by the analysis steps.
///
/// Deserialized from the `[analysis]` table of the app config. Every
/// field is optional in TOML and falls back to the Bogotá defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Buffer radius for transit station context (meters).
    pub transit_radius_m: f64,
    /// Buffer radius for school context (meters).
    pub school_radius_m: f64,
    /// Buffer radius for the neighbor value average (meters).
    pub neighbor_radius_m: f64,
    /// Buffer radius for the land-use distribution (meters).
    pub land_use_radius_m: f64,
    /// Label of the current valuation period.
    pub current_period_label: String,
    /// Year of the first projected half-year period.
    pub first_projection_year: u16,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            transit_radius_m: 800.0,
            school_radius_m: 1000.0,
            neighbor_radius_m: 300.0,
            land_use_radius_m: 500.0,
            current_period_label: "2024-S2".to_string(),
            first_projection_year: 2025,
        }
    }
}

impl AnalysisConfig {
    /// Labels of the four projected periods: two half-years for each of
    /// two years, formatted `<year>-S<half>`.
    #[must_use]
    pub fn projection_labels(&self) -> [String; 4] {
        let y = u32::from(self.first_projection_year);
        let next = y + 1;
        [
            format!("{y}-S1"),
            format!("{y}-S2"),
            format!("{next}-S1"),
            format!("{next}-S2"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels() {
        assert_eq!(
            AnalysisConfig::default().projection_labels(),
            ["2025-S1", "2025-S2", "2026-S1", "2026-S2"]
        );
    }

    #[test]
    fn last_representable_year_does_not_wrap() {
        let config: AnalysisConfig = toml::de::from_str("first_projection_year = 65535").unwrap();
        assert_eq!(
            config.projection_labels(),
            ["65535-S1", "65535-S2", "65536-S1", "65536-S2"]
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AnalysisConfig = toml::de::from_str("neighbor_radius_m = 250.0").unwrap();
        assert!((config.neighbor_radius_m - 250.0).abs() < f64::EPSILON);
        assert!((config.transit_radius_m - 800.0).abs() < f64::EPSILON);
        assert_eq!(config.current_period_label, "2024-S2");
    }
}
