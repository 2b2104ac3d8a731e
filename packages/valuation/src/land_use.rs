//! Land-use distribution of the blocks around a selected block.

use avm_spatial::buffer_around_geometry;
use avm_valuation_models::LandUse;
use avm_valuation_models::results::{CategoryCount, LandUseDistribution};

use crate::{DistrictSelection, ValuationError};

/// Counts the land-use categories of the blocks intersecting a
/// `radius_m` buffer around the block.
///
/// Unclassified blocks are counted as their own category. Counts are
/// sorted descending; ties keep the order in which the categories were
/// first encountered. The majority is the first row, or
/// [`LandUse::Unclassified`] when nothing intersects.
///
/// # Errors
///
/// * [`ValuationError::BlockNotFound`] if the block is not in the selection
/// * [`ValuationError::Spatial`] if the buffer cannot be built
pub fn distribution(
    selection: &DistrictSelection<'_>,
    block_id: &str,
    radius_m: f64,
) -> Result<LandUseDistribution, ValuationError> {
    let selected = selection.block(block_id)?;
    let buffer = buffer_around_geometry(&selected.block.geometry, selection.crs(), radius_m)?;
    let within = selection.blocks_intersecting(&buffer)?;

    let counts = count_categories(within.iter().map(|b| &b.land_use));
    let majority = counts
        .first()
        .map_or(LandUse::Unclassified, |c| c.category.clone());

    log::debug!(
        "Block {block_id}: {} blocks within {radius_m} m, majority {majority}",
        within.len()
    );

    Ok(LandUseDistribution {
        radius_m,
        total: within.len(),
        counts,
        majority,
    })
}

/// Counts occurrences per category, sorted by count descending with
/// first-seen order for ties.
#[must_use]
pub fn count_categories<'a>(
    categories: impl IntoIterator<Item = &'a LandUse>,
) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();

    for category in categories {
        if let Some(entry) = counts.iter_mut().find(|c| c.category == *category) {
            entry.count += 1;
        } else {
            counts.push(CategoryCount {
                category: category.clone(),
                count: 1,
            });
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
