//! District lookup and the per-district block selection.

use std::collections::BTreeMap;

use avm_spatial::{SpatialIndex, filter_by_attribute, filter_by_containment, to_crs};
use avm_spatial_models::{Crs, Layer};
use avm_valuation_models::{Area, Datasets, District, EnrichedBlock, LandUse};
use geo::{Point, Polygon};

use crate::ValuationError;

/// Returns the district with `code`.
///
/// # Errors
///
/// Returns [`ValuationError::DistrictNotFound`] if no district has the code.
pub fn find_district(districts: &Layer<District>, code: u32) -> Result<&District, ValuationError> {
    filter_by_attribute(districts, |d| d.code, &code)
        .into_iter()
        .next()
        .ok_or(ValuationError::DistrictNotFound { code })
}

/// Returns the first district named `name`.
///
/// Names are not guaranteed unique; the first match in source order wins.
///
/// # Errors
///
/// Returns [`ValuationError::DistrictNameNotFound`] if no district matches.
pub fn find_district_by_name<'a>(
    districts: &'a Layer<District>,
    name: &str,
) -> Result<&'a District, ValuationError> {
    filter_by_attribute(districts, |d| d.name.as_str(), &name)
        .into_iter()
        .next()
        .ok_or_else(|| ValuationError::DistrictNameNotFound {
            name: name.to_string(),
        })
}

/// Resolves a clicked WGS84 longitude/latitude to the district under it.
///
/// Returns `Ok(None)` when the point falls outside every district.
///
/// # Errors
///
/// Returns [`ValuationError::Spatial`] if the district layer has no
/// coordinate reference or the point cannot be projected into it.
pub fn resolve_district_at(
    districts: &Layer<District>,
    lon: f64,
    lat: f64,
) -> Result<Option<&District>, ValuationError> {
    let point = to_crs(&Point::new(lon, lat), Some(Crs::GEOGRAPHIC), districts.crs())?;
    Ok(filter_by_containment(districts, &point))
}

/// The blocks of one district joined with their land-use category.
///
/// This is the context every analysis step works from. It borrows the
/// session's datasets and is rebuilt whenever the user picks a different
/// district.
pub struct DistrictSelection<'a> {
    datasets: &'a Datasets,
    district: &'a District,
    areas: BTreeMap<&'a str, &'a Area>,
    blocks: Vec<EnrichedBlock<'a>>,
    index: SpatialIndex,
}

impl std::fmt::Debug for DistrictSelection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistrictSelection")
            .field("district", &self.district.name)
            .field("areas", &self.areas.len())
            .field("blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

impl<'a> DistrictSelection<'a> {
    /// Selects the district with `code`.
    ///
    /// # Errors
    ///
    /// * [`ValuationError::DistrictNotFound`] if the code is unknown
    /// * [`ValuationError::NoBlocksInDistrict`] if the district has no blocks
    pub fn by_code(datasets: &'a Datasets, code: u32) -> Result<Self, ValuationError> {
        let district = find_district(&datasets.districts, code)?;
        Self::build(datasets, district)
    }

    /// Selects the first district named `name`.
    ///
    /// # Errors
    ///
    /// * [`ValuationError::DistrictNameNotFound`] if the name is unknown
    /// * [`ValuationError::NoBlocksInDistrict`] if the district has no blocks
    pub fn by_name(datasets: &'a Datasets, name: &str) -> Result<Self, ValuationError> {
        let district = find_district_by_name(&datasets.districts, name)?;
        Self::build(datasets, district)
    }

    fn build(datasets: &'a Datasets, district: &'a District) -> Result<Self, ValuationError> {
        let code = district.code;

        let blocks = filter_by_attribute(&datasets.blocks, |b| b.district_code, &code);
        if blocks.is_empty() {
            return Err(ValuationError::NoBlocksInDistrict { code });
        }

        // Left join: first area wins on duplicate ids, unmatched blocks
        // stay unclassified.
        let mut areas = BTreeMap::new();
        for area in filter_by_attribute(&datasets.areas, |a| a.district_code, &code) {
            areas.entry(area.id.as_str()).or_insert(area);
        }

        let blocks: Vec<EnrichedBlock<'a>> = blocks
            .into_iter()
            .map(|block| {
                let land_use = block
                    .area_id
                    .as_deref()
                    .and_then(|id| areas.get(id))
                    .map_or(LandUse::Unclassified, |area| {
                        LandUse::from_raw(area.land_use.as_deref())
                    });
                EnrichedBlock { block, land_use }
            })
            .collect();

        let index = SpatialIndex::build(&blocks);

        log::debug!(
            "Selected district {} ({code}): {} blocks, {} areas",
            district.name,
            blocks.len(),
            areas.len()
        );

        Ok(Self {
            datasets,
            district,
            areas,
            blocks,
            index,
        })
    }

    /// The selected district.
    #[must_use]
    pub const fn district(&self) -> &'a District {
        self.district
    }

    /// The session datasets this selection was built from.
    #[must_use]
    pub const fn datasets(&self) -> &'a Datasets {
        self.datasets
    }

    /// Coordinate reference of the block geometries.
    #[must_use]
    pub const fn crs(&self) -> Option<Crs> {
        self.datasets.blocks.crs()
    }

    /// The district's blocks in source order.
    #[must_use]
    pub fn blocks(&self) -> &[EnrichedBlock<'a>] {
        &self.blocks
    }

    /// Looks up a block of this district.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::BlockNotFound`] if the id is not part of
    /// the district.
    pub fn block(&self, id: &str) -> Result<&EnrichedBlock<'a>, ValuationError> {
        self.blocks
            .iter()
            .find(|b| b.id() == id)
            .ok_or_else(|| ValuationError::BlockNotFound { id: id.to_string() })
    }

    /// Looks up one of the district's land-use areas.
    #[must_use]
    pub fn area(&self, id: &str) -> Option<&'a Area> {
        self.areas.get(id).copied()
    }

    /// Blocks whose geometry intersects the WGS84 `area_of_interest`, in
    /// source order.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::Spatial`] if the block layer has no
    /// coordinate reference or the area cannot be projected into it.
    pub fn blocks_intersecting(
        &self,
        area_of_interest: &Polygon<f64>,
    ) -> Result<Vec<&EnrichedBlock<'a>>, ValuationError> {
        let area_of_interest = to_crs(area_of_interest, Some(Crs::GEOGRAPHIC), self.crs())?;
        Ok(self.index.intersecting(&self.blocks, &area_of_interest))
    }

    /// Distinct land-use categories of the district in first-seen order.
    #[must_use]
    pub fn land_use_categories(&self) -> Vec<&LandUse> {
        let mut seen: Vec<&LandUse> = Vec::new();
        for block in &self.blocks {
            if !seen.contains(&&block.land_use) {
                seen.push(&block.land_use);
            }
        }
        seen
    }
}
