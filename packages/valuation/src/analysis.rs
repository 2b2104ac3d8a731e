//! Runs every analysis step for one block.

use avm_valuation_models::results::{
    ComparativeValuation, FactSheet, LandUseDistribution, ProjectionSeries, ProximityContext,
    SecurityContext,
};
use avm_valuation_models::{AnalysisConfig, EnrichedBlock};
use serde::Serialize;

use crate::district::find_district;
use crate::{
    DistrictSelection, ValuationError, comparative, land_use, projection, proximity, security,
};

/// Everything the report needs about one block.
///
/// An incomplete projection is carried as [`ProjectionSeries::Incomplete`]
/// so the rest of the report can still be produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAnalysis<'a> {
    /// District code of the block.
    pub district_code: u32,
    /// District name of the block.
    pub district_name: String,
    /// The selected block.
    pub block: &'a EnrichedBlock<'a>,
    /// Transit and school context.
    pub proximity: ProximityContext,
    /// Own value versus area peers and neighbors.
    pub comparative: ComparativeValuation<'a>,
    /// Land-use distribution around the block.
    pub land_use: LandUseDistribution,
    /// Projection series.
    pub projection: ProjectionSeries,
    /// Crime ranking of the districts.
    pub security: SecurityContext,
    /// Summary card.
    pub fact_sheet: FactSheet,
}

impl<'a> BlockAnalysis<'a> {
    /// Runs the proximity, comparative, land-use, projection and security
    /// steps for `block_id` within `selection`.
    ///
    /// # Errors
    ///
    /// * [`ValuationError::BlockNotFound`] if the block is not in the selection
    /// * [`ValuationError::DistrictNotFound`] if the block's district code is
    ///   not in the district table
    /// * [`ValuationError::Spatial`] if a buffer or projection fails
    pub fn run(
        selection: &'a DistrictSelection<'a>,
        block_id: &str,
        config: &AnalysisConfig,
    ) -> Result<Self, ValuationError> {
        let datasets = selection.datasets();
        let block = selection.block(block_id)?;

        let district = find_district(&datasets.districts, block.block.district_code)?;

        let proximity = proximity::proximity_context(datasets, block.block, config)?;
        let comparative = comparative::compare(selection, block_id, config.neighbor_radius_m)?;
        let land_use = land_use::distribution(selection, block_id, config.land_use_radius_m)?;
        let projection = projection::build_series(block.block, config);
        let security = security::security_context(&datasets.districts, district.code)?;

        let fact_sheet = FactSheet {
            block_id: block.id().to_string(),
            district_name: district.name.clone(),
            stratum: block.block.stratum,
            value_m2: block.value_m2(),
            area_average: comparative.area_peer_value,
            neighbor_average: comparative.neighbor_value,
            profitability: block.block.profitability.clone(),
            nearby_schools: block.block.nearby_schools,
            nearby_stations: block.block.nearby_stations,
            zone_label: block
                .area_id()
                .and_then(|id| selection.area(id))
                .and_then(|area| area.zone_label.clone()),
            land_use: block.land_use.clone(),
            majority_land_use: land_use.majority.clone(),
        };

        log::info!(
            "Analyzed block {block_id} in {} (projection {})",
            district.name,
            if projection.is_complete() {
                "complete"
            } else {
                "incomplete"
            }
        );

        Ok(Self {
            district_code: district.code,
            district_name: district.name.clone(),
            block,
            proximity,
            comparative,
            land_use,
            projection,
            security,
            fact_sheet,
        })
    }
}
