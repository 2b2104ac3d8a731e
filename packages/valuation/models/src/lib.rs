#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cadastral entity types and valuation result types.
//!
//! Districts ("localidades"), land-use areas, blocks ("manzanas") and the
//! transit/school point groups are loaded once per session and only
//! borrowed afterwards. Optional source attributes are modelled as
//! `Option` fields; the unclassified land-use sentinel is applied once,
//! through [`LandUse::from_raw`], rather than at each consumer.

pub mod config;
pub mod results;

use avm_spatial_models::{Feature, Layer};
use geo::{MultiPoint, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

pub use config::AnalysisConfig;

/// Display label for blocks without a land-use classification.
pub const UNCLASSIFIED_LABEL: &str = "Sin clasificación POT";

/// An administrative district of the city.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    /// Unique district code (e.g. `1` for Usaquén).
    pub code: u32,
    /// Display name.
    pub name: String,
    /// Reported crimes in the district.
    pub crime_count: u64,
    /// Categorical crime risk label (e.g. "Alto").
    pub risk_level: String,
    /// District boundary.
    pub geometry: MultiPolygon<f64>,
}

impl Feature for District {
    type Geometry = MultiPolygon<f64>;

    fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }
}

/// A land-use zone of the territorial plan (POT).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    /// Unique area id.
    pub id: String,
    /// Code of the district this area belongs to.
    pub district_code: u32,
    /// Simplified land-use category, if classified.
    pub land_use: Option<String>,
    /// Normative zone label (e.g. "Área de Actividad Estructurante").
    pub zone_label: Option<String>,
    /// Raw zone-plan identifier.
    pub zone_plan_id: Option<String>,
}

/// A cadastral block ("manzana"), the atomic unit of valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Unique block id.
    pub id: String,
    /// Code of the district this block belongs to.
    pub district_code: u32,
    /// Land-use area this block falls in.
    pub area_id: Option<String>,
    /// Block outline.
    pub geometry: Polygon<f64>,
    /// Current value per square meter.
    pub value_m2: Option<f64>,
    /// Projected value per square meter for the next four half-year
    /// periods, in chronological order.
    pub projected_values: [Option<f64>; 4],
    /// Socio-economic stratum (1-6).
    pub stratum: Option<u8>,
    /// Profitability label.
    pub profitability: Option<String>,
    /// Id of the transit station group reachable from this block.
    pub transit_group: Option<String>,
    /// Id of the school catchment group for this block.
    pub school_group: Option<String>,
    /// Schools within 1 km.
    pub nearby_schools: Option<u32>,
    /// Transit stations within walking distance.
    pub nearby_stations: Option<u32>,
}

impl Block {
    /// Current value followed by the four projected values.
    #[must_use]
    pub const fn value_series(&self) -> [Option<f64>; 5] {
        let [a, b, c, d] = self.projected_values;
        [self.value_m2, a, b, c, d]
    }
}

impl Feature for Block {
    type Geometry = Polygon<f64>;

    fn geometry(&self) -> &Polygon<f64> {
        &self.geometry
    }
}

/// Geometry of a transit or school feature group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupGeometry {
    /// A single location.
    Point(Point<f64>),
    /// Several locations sharing one group id.
    MultiPoint(MultiPoint<f64>),
}

impl GroupGeometry {
    /// Expands the geometry into individual points.
    #[must_use]
    pub fn points(&self) -> Vec<Point<f64>> {
        match self {
            Self::Point(p) => vec![*p],
            Self::MultiPoint(mp) => mp.0.clone(),
        }
    }
}

/// A group of transit stations or schools keyed by a group id.
#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    /// Group id referenced by [`Block::transit_group`] or
    /// [`Block::school_group`].
    pub group_id: String,
    /// Group locations.
    pub geometry: GroupGeometry,
}

/// Land-use category of a block after joining against its area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LandUse {
    /// A named category from the territorial plan.
    Classified(String),
    /// No category: no area, unknown area, or a blank category.
    Unclassified,
}

impl LandUse {
    /// Normalizes a raw category: blank or absent becomes
    /// [`LandUse::Unclassified`].
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() && s != UNCLASSIFIED_LABEL => Self::Classified(s.to_string()),
            _ => Self::Unclassified,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Classified(s) => s,
            Self::Unclassified => UNCLASSIFIED_LABEL,
        }
    }
}

impl std::fmt::Display for LandUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for LandUse {
    fn from(value: String) -> Self {
        Self::from_raw(Some(&value))
    }
}

impl From<LandUse> for String {
    fn from(value: LandUse) -> Self {
        match value {
            LandUse::Classified(s) => s,
            LandUse::Unclassified => UNCLASSIFIED_LABEL.to_string(),
        }
    }
}

/// A block of the selected district joined with its land-use category.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBlock<'a> {
    /// The underlying block.
    pub block: &'a Block,
    /// Category of the block's area within the district.
    pub land_use: LandUse,
}

impl EnrichedBlock<'_> {
    /// Block id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.block.id
    }

    /// Current value per square meter.
    #[must_use]
    pub const fn value_m2(&self) -> Option<f64> {
        self.block.value_m2
    }

    /// Area id of the block.
    #[must_use]
    pub fn area_id(&self) -> Option<&str> {
        self.block.area_id.as_deref()
    }
}

impl Feature for EnrichedBlock<'_> {
    type Geometry = Polygon<f64>;

    fn geometry(&self) -> &Polygon<f64> {
        &self.block.geometry
    }
}

impl Serialize for EnrichedBlock<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("EnrichedBlock", 5)?;
        s.serialize_field("id", &self.block.id)?;
        s.serialize_field("districtCode", &self.block.district_code)?;
        s.serialize_field("areaId", &self.block.area_id)?;
        s.serialize_field("landUse", &self.land_use)?;
        s.serialize_field("valueM2", &self.block.value_m2)?;
        s.end()
    }
}

/// The five reference collections for one session.
#[derive(Debug, Clone)]
pub struct Datasets {
    /// Districts ("localidades").
    pub districts: Layer<District>,
    /// Land-use areas.
    pub areas: Layer<Area>,
    /// Cadastral blocks ("manzanas").
    pub blocks: Layer<Block>,
    /// Transit station groups.
    pub transit: Layer<PointGroup>,
    /// School groups.
    pub schools: Layer<PointGroup>,
}
