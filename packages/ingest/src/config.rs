//! Application configuration: dataset paths, property mappings and
//! analysis parameters.
//!
//! The default configuration is embedded at compile time via
//! [`include_str!`]. A user config only needs to list the values it
//! changes; everything else falls back to the Bogotá defaults.

use std::path::{Path, PathBuf};

use avm_valuation_models::AnalysisConfig;
use serde::{Deserialize, Serialize};

use crate::{DatasetKind, IngestError};

/// The embedded default config.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Top-level application config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where the five datasets live.
    pub datasets: DatasetPaths,
    /// Property names per dataset.
    pub fields: FieldMappings,
    /// Buffer radii and projection calendar.
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Parses the embedded default config.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Toml`] if the embedded file is invalid.
    pub fn embedded() -> Result<Self, IngestError> {
        Self::from_toml_str(DEFAULT_CONFIG_TOML)
    }

    /// Parses a config from TOML text. Relative paths are left as-is.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Toml`] if the text is not valid TOML or does
    /// not match the schema.
    pub fn from_toml_str(text: &str) -> Result<Self, IngestError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Reads a config file. Relative dataset paths are resolved against
    /// the directory containing the file.
    ///
    /// # Errors
    ///
    /// * [`IngestError::Io`] if the file cannot be read
    /// * [`IngestError::Toml`] if it does not parse
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&text)?;

        if let Some(dir) = path.parent() {
            config.datasets = config.datasets.relative_to(dir);
        }

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// File paths of the five datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    pub districts: PathBuf,
    pub areas: PathBuf,
    pub blocks: PathBuf,
    pub transit: PathBuf,
    pub schools: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            districts: PathBuf::from("data/dim_localidad.geojson"),
            areas: PathBuf::from("data/dim_area.geojson"),
            blocks: PathBuf::from("data/tabla_hechos.geojson"),
            transit: PathBuf::from("data/dim_transporte.geojson"),
            schools: PathBuf::from("data/dim_colegios.geojson"),
        }
    }
}

impl DatasetPaths {
    /// Returns the path of one dataset.
    #[must_use]
    pub fn path(&self, kind: DatasetKind) -> &Path {
        match kind {
            DatasetKind::Districts => &self.districts,
            DatasetKind::Areas => &self.areas,
            DatasetKind::Blocks => &self.blocks,
            DatasetKind::Transit => &self.transit,
            DatasetKind::Schools => &self.schools,
        }
    }

    /// Prefixes every relative path with `dir`.
    #[must_use]
    pub fn relative_to(self, dir: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { dir.join(p) } else { p };
        Self {
            districts: resolve(self.districts),
            areas: resolve(self.areas),
            blocks: resolve(self.blocks),
            transit: resolve(self.transit),
            schools: resolve(self.schools),
        }
    }
}

/// Property names for every dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMappings {
    pub districts: DistrictFields,
    pub areas: AreaFields,
    pub blocks: BlockFields,
    pub transit: GroupFields,
    pub schools: GroupFields,
}

impl Default for FieldMappings {
    fn default() -> Self {
        Self {
            districts: DistrictFields::default(),
            areas: AreaFields::default(),
            blocks: BlockFields::default(),
            transit: GroupFields {
                group_id: "id_combi_acceso".to_string(),
            },
            schools: GroupFields {
                group_id: "id_com_colegios".to_string(),
            },
        }
    }
}

/// Property names of the districts dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistrictFields {
    pub code: String,
    pub name: String,
    pub crime_count: String,
    pub risk_level: String,
}

impl Default for DistrictFields {
    fn default() -> Self {
        Self {
            code: "num_localidad".to_string(),
            name: "nombre_localidad".to_string(),
            crime_count: "cantidad_delitos".to_string(),
            risk_level: "nivel_riesgo_delictivo".to_string(),
        }
    }
}

/// Property names of the areas dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaFields {
    pub id: String,
    pub district_code: String,
    pub land_use: String,
    pub zone_label: String,
    pub zone_plan_id: String,
}

impl Default for AreaFields {
    fn default() -> Self {
        Self {
            id: "id_area".to_string(),
            district_code: "num_localidad".to_string(),
            land_use: "uso_pot_simplificado".to_string(),
            zone_label: "area_pot".to_string(),
            zone_plan_id: "cod_pot".to_string(),
        }
    }
}

/// Property names of the blocks dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockFields {
    pub id: String,
    pub district_code: String,
    pub area_id: String,
    pub value_m2: String,
    /// The four projected value properties, in chronological order.
    pub projected_values: [String; 4],
    pub stratum: String,
    pub profitability: String,
    pub transit_group: String,
    pub school_group: String,
    pub nearby_schools: String,
    pub nearby_stations: String,
}

impl Default for BlockFields {
    fn default() -> Self {
        Self {
            id: "id_manzana_unif".to_string(),
            district_code: "num_localidad".to_string(),
            area_id: "id_area".to_string(),
            value_m2: "valor_m2".to_string(),
            projected_values: [
                "valor_2025_s1".to_string(),
                "valor_2025_s2".to_string(),
                "valor_2026_s1".to_string(),
                "valor_2026_s2".to_string(),
            ],
            stratum: "estrato".to_string(),
            profitability: "rentabilidad".to_string(),
            transit_group: "id_combi_acceso".to_string(),
            school_group: "id_com_colegios".to_string(),
            nearby_schools: "colegio_cerca".to_string(),
            nearby_stations: "estaciones_cerca".to_string(),
        }
    }
}

/// Property names of a transit or school dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFields {
    /// Group id referenced by the blocks.
    pub group_id: String,
}
