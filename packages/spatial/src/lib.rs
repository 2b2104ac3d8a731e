#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reprojection, buffering and spatial filtering.
//!
//! Geometries arrive in WGS84 longitude/latitude. Anything measured in
//! meters (buffers, centroids) is computed in the Bogotá Transverse
//! Mercator grid (EPSG:3116) and projected back, so a radius parameter
//! reads directly as meters on the ground.
//!
//! The filter functions work on any record implementing
//! [`avm_spatial_models::Feature`]. [`index::SpatialIndex`] provides the
//! same intersection query backed by an R-tree for collections that are
//! queried repeatedly.

pub mod filter;
pub mod index;
pub mod projection;

pub use filter::{
    buffer_around_geometry, filter_by_attribute, filter_by_containment, filter_by_intersection,
};
pub use index::SpatialIndex;
pub use projection::{Reprojector, metric_centroid, to_crs, to_geographic, to_metric};

use thiserror::Error;

/// Errors that can occur during spatial operations.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The geometry has no coordinate reference assigned.
    #[error("Geometry has no coordinate reference assigned")]
    MissingReference,

    /// Coordinate transformation failed.
    #[error("Projection error: {message}")]
    Projection {
        /// Description of what went wrong.
        message: String,
    },

    /// Buffer radius was not a positive, finite number of meters.
    #[error("Invalid buffer radius: {radius}")]
    InvalidRadius {
        /// The rejected radius.
        radius: f64,
    },

    /// Buffering produced no polygon.
    #[error("Buffer produced an empty geometry")]
    EmptyBuffer,

    /// The geometry has no centroid (it is empty).
    #[error("Geometry is empty")]
    EmptyGeometry,
}
