//! Own value versus land-use area peers and nearby blocks.

use avm_spatial::{buffer_around_geometry, filter_by_attribute};
use avm_valuation_models::EnrichedBlock;
use avm_valuation_models::results::{ComparativeValuation, PeerScope};

use crate::{DistrictSelection, ValuationError, mean_or_zero};

/// Compares a block's value per square meter with the mean of its area
/// peers and the mean of the blocks within `neighbor_radius_m`.
///
/// Area peers share the block's area id; a block without an area id is
/// compared with the other blocks without one. Both means are `0.0` when
/// there is no data.
///
/// # Errors
///
/// * [`ValuationError::BlockNotFound`] if the block is not in the selection
/// * [`ValuationError::Spatial`] if the neighbor buffer cannot be built
pub fn compare<'a>(
    selection: &'a DistrictSelection<'a>,
    block_id: &str,
    neighbor_radius_m: f64,
) -> Result<ComparativeValuation<'a>, ValuationError> {
    let selected = selection.block(block_id)?;

    let area_key = selected.area_id();
    let area_peers = filter_by_attribute(selection.blocks(), EnrichedBlock::area_id, &area_key);
    let peer_scope = area_key.map_or(PeerScope::Unassigned, |id| PeerScope::Area {
        area_id: id.to_string(),
    });

    let buffer = buffer_around_geometry(
        &selected.block.geometry,
        selection.crs(),
        neighbor_radius_m,
    )?;
    let neighbors = selection.blocks_intersecting(&buffer)?;

    let area_peer_value = mean_or_zero(area_peers.iter().copied());
    let neighbor_value = mean_or_zero(neighbors.iter().copied());

    log::debug!(
        "Block {block_id}: own={:?} area={area_peer_value:.0} ({} peers) \
         neighbors={neighbor_value:.0} ({} blocks)",
        selected.value_m2(),
        area_peers.len(),
        neighbors.len()
    );

    Ok(ComparativeValuation {
        own_value: selected.value_m2(),
        area_peer_value,
        neighbor_value,
        neighbor_radius_m,
        peer_scope,
        area_peers,
        neighbors,
    })
}
