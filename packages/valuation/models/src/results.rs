//! Result types produced by the analysis steps.
//!
//! These are plain values returned to the caller and handed to rendering
//! and reporting collaborators. They serialize to JSON with coordinates as
//! `[lon, lat]` pairs.

use avm_spatial_models::LonLat;
use serde::Serialize;

use crate::{EnrichedBlock, LandUse};

/// A buffer drawn around the selected block and the points resolved for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferedPoints {
    /// Buffer radius in meters.
    pub radius_m: f64,
    /// Exterior ring of the buffer.
    pub buffer_ring: Vec<LonLat>,
    /// Points of the block's feature group; empty when the block has no
    /// group id or the group is missing.
    pub points: Vec<LonLat>,
}

/// Transit and school context around a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProximityContext {
    /// Selected block id.
    pub block_id: String,
    /// Block centroid (computed in the metric grid).
    pub centroid: LonLat,
    /// Exterior ring of the block.
    pub block_ring: Vec<LonLat>,
    /// Transit stations and their buffer.
    pub transit: BufferedPoints,
    /// Schools and their buffer.
    pub schools: BufferedPoints,
}

/// Which peer set the area average was computed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PeerScope {
    /// Blocks sharing the selected block's area id.
    #[serde(rename_all = "camelCase")]
    Area {
        /// The shared area id.
        area_id: String,
    },
    /// Blocks without an area id, like the selected block.
    Unassigned,
}

/// Own value versus area peers and neighbors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeValuation<'a> {
    /// Selected block's value per square meter.
    pub own_value: Option<f64>,
    /// Mean value of the area peers, `0.0` when there is no data.
    pub area_peer_value: f64,
    /// Mean value of blocks intersecting the neighbor buffer, `0.0` when
    /// there is no data.
    pub neighbor_value: f64,
    /// Radius of the neighbor buffer in meters.
    pub neighbor_radius_m: f64,
    /// Peer set the area average was computed over.
    pub peer_scope: PeerScope,
    /// Blocks in the area peer set.
    pub area_peers: Vec<&'a EnrichedBlock<'a>>,
    /// Blocks intersecting the neighbor buffer.
    pub neighbors: Vec<&'a EnrichedBlock<'a>>,
}

/// Number of blocks of one land-use category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Land-use category.
    pub category: LandUse,
    /// Number of blocks.
    pub count: usize,
}

/// Land-use make-up of the blocks around the selected block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandUseDistribution {
    /// Buffer radius in meters.
    pub radius_m: f64,
    /// Blocks intersecting the buffer.
    pub total: usize,
    /// Counts sorted by count descending, ties in first-seen order.
    pub counts: Vec<CategoryCount>,
    /// Top category, or unclassified when no block intersects.
    pub majority: LandUse,
}

/// One labelled value of the projection series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    /// Period label (e.g. "2025-S1").
    pub label: String,
    /// Value per square meter.
    pub value: f64,
}

/// The current value plus four projected periods, all or nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ProjectionSeries {
    /// All five values are present.
    Complete {
        /// Points in chronological order.
        points: Vec<ProjectionPoint>,
    },
    /// At least one value is missing; consumers omit the projection.
    Incomplete {
        /// Labels of the missing periods.
        missing: Vec<String>,
    },
}

impl ProjectionSeries {
    /// Whether the series is complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// The points, if complete.
    #[must_use]
    pub fn points(&self) -> Option<&[ProjectionPoint]> {
        match self {
            Self::Complete { points } => Some(points),
            Self::Incomplete { .. } => None,
        }
    }
}

/// One district row of the security ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRow {
    /// District code.
    pub code: u32,
    /// District name.
    pub name: String,
    /// Reported crimes.
    pub crime_count: u64,
    /// Crime risk label.
    pub risk_level: String,
    /// Whether this is the selected block's district.
    pub is_current: bool,
    /// Bar label: the risk level for the current district, empty otherwise.
    pub label: String,
}

/// Crime ranking of all districts with the selected one highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    /// All districts sorted by crime count ascending.
    pub ranking: Vec<SecurityRow>,
    /// The selected block's district.
    pub current: SecurityRow,
}

/// Summary card of the selected block for the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSheet {
    /// Block id.
    pub block_id: String,
    /// District name.
    pub district_name: String,
    /// Socio-economic stratum.
    pub stratum: Option<u8>,
    /// Value per square meter.
    pub value_m2: Option<f64>,
    /// Area peer average.
    pub area_average: f64,
    /// Neighbor average.
    pub neighbor_average: f64,
    /// Profitability label.
    pub profitability: Option<String>,
    /// Schools within 1 km.
    pub nearby_schools: Option<u32>,
    /// Nearby transit stations.
    pub nearby_stations: Option<u32>,
    /// Normative zone label of the block's area.
    pub zone_label: Option<String>,
    /// Land use of the block's own area.
    pub land_use: LandUse,
    /// Predominant land use around the block.
    pub majority_land_use: LandUse,
}
