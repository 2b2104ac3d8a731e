//! Transit and school context around a block.
//!
//! Each block references at most one transit access group and one school
//! catchment group. The resolver draws a buffer around the block for each
//! and expands the referenced group into individual points. A missing id
//! or an unknown group is not an error; it yields an empty point set.

use avm_spatial::{buffer_around_geometry, filter_by_attribute, metric_centroid, to_geographic};
use avm_spatial_models::{Crs, Layer, LonLat};
use avm_valuation_models::results::{BufferedPoints, ProximityContext};
use avm_valuation_models::{AnalysisConfig, Block, Datasets, PointGroup};
use geo::{LineString, MultiPoint, Point, Polygon};

use crate::ValuationError;

/// Resolves the centroid, outline, buffers and point groups of a block.
///
/// # Errors
///
/// Returns [`ValuationError::Spatial`] if a layer involved has no
/// coordinate reference or a projection fails.
pub fn proximity_context(
    datasets: &Datasets,
    block: &Block,
    config: &AnalysisConfig,
) -> Result<ProximityContext, ValuationError> {
    let crs = datasets.blocks.crs();

    let centroid = metric_centroid(&block.geometry, crs)?;
    let outline = to_geographic(&block.geometry, crs)?;

    let transit = buffered_points(
        &block.geometry,
        crs,
        config.transit_radius_m,
        &datasets.transit,
        block.transit_group.as_deref(),
    )?;
    let schools = buffered_points(
        &block.geometry,
        crs,
        config.school_radius_m,
        &datasets.schools,
        block.school_group.as_deref(),
    )?;

    log::debug!(
        "Block {}: {} transit points, {} schools",
        block.id,
        transit.points.len(),
        schools.points.len()
    );

    Ok(ProximityContext {
        block_id: block.id.clone(),
        centroid: centroid.into(),
        block_ring: ring(outline.exterior()),
        transit,
        schools,
    })
}

fn buffered_points(
    geometry: &Polygon<f64>,
    crs: Option<Crs>,
    radius_m: f64,
    groups: &Layer<PointGroup>,
    group_id: Option<&str>,
) -> Result<BufferedPoints, ValuationError> {
    let buffer = buffer_around_geometry(geometry, crs, radius_m)?;

    Ok(BufferedPoints {
        radius_m,
        buffer_ring: ring(buffer.exterior()),
        points: group_points(groups, group_id)?,
    })
}

/// Expands every group with `group_id` into WGS84 points.
///
/// # Errors
///
/// Returns [`ValuationError::Spatial`] if matching points exist but the
/// layer has no coordinate reference.
pub fn group_points(
    groups: &Layer<PointGroup>,
    group_id: Option<&str>,
) -> Result<Vec<LonLat>, ValuationError> {
    let Some(group_id) = group_id else {
        return Ok(Vec::new());
    };

    let points: Vec<Point<f64>> = filter_by_attribute(groups, |g| g.group_id.as_str(), &group_id)
        .into_iter()
        .flat_map(|g| g.geometry.points())
        .collect();

    if points.is_empty() {
        log::debug!("No point group with id {group_id}");
        return Ok(Vec::new());
    }

    let geographic = to_geographic(&MultiPoint(points), groups.crs())?;
    Ok(geographic.0.into_iter().map(LonLat::from).collect())
}

fn ring(line: &LineString<f64>) -> Vec<LonLat> {
    line.0.iter().copied().map(LonLat::from).collect()
}
