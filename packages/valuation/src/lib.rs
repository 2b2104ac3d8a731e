#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Comparative valuation pipeline for Bogotá cadastral blocks.
//!
//! A session starts with a [`district::DistrictSelection`]: the blocks of
//! one district joined with their land-use category. Each analysis step
//! then takes the selection and a block id and returns a plain value:
//!
//! * [`proximity`] resolves transit and school context around the block
//! * [`comparative`] compares the block's value with its area and neighbors
//! * [`land_use`] counts land-use categories around the block
//! * [`projection`] extracts the all-or-nothing projection series
//! * [`security`] ranks the block's district by reported crime
//!
//! [`analysis::BlockAnalysis`] runs all of them for one block.

pub mod analysis;
pub mod comparative;
pub mod district;
pub mod land_use;
pub mod projection;
pub mod proximity;
pub mod security;

#[cfg(test)]
mod fixtures;

pub use analysis::BlockAnalysis;
pub use district::DistrictSelection;

use avm_spatial::SpatialError;
use avm_valuation_models::EnrichedBlock;
use thiserror::Error;

/// Errors that can occur during a valuation step.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// No district has the given code.
    #[error("District not found: code {code}")]
    DistrictNotFound {
        /// The missing district code.
        code: u32,
    },

    /// No district has the given name.
    #[error("District not found: '{name}'")]
    DistrictNameNotFound {
        /// The missing district name.
        name: String,
    },

    /// The district exists but has no blocks.
    #[error("No blocks found for district {code}")]
    NoBlocksInDistrict {
        /// The district code.
        code: u32,
    },

    /// The block id is not part of the selected district.
    #[error("Block not found: '{id}'")]
    BlockNotFound {
        /// The missing block id.
        id: String,
    },

    /// A spatial operation failed.
    #[error("Spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

/// Arithmetic mean of the non-null block values, or `0.0` when there are
/// none. An empty subset and a subset of null values both read as "no data".
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_or_zero<'a, 'b: 'a>(blocks: impl IntoIterator<Item = &'a EnrichedBlock<'b>>) -> f64 {
    let (sum, count) = blocks
        .into_iter()
        .filter_map(EnrichedBlock::value_m2)
        .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 { 0.0 } else { sum / count as f64 }
}
