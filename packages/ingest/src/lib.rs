#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the five Bogotá cadastral datasets from `GeoJSON` files.
//!
//! Property names are taken from the [`config::FieldMappings`] of the app
//! config so the loader is not tied to one export of the data. Records
//! that cannot be used are skipped with a warning rather than failing the
//! whole load.

pub mod config;
pub mod loader;
pub mod normalize;
pub mod progress;

use strum_macros::{Display, EnumIter};

pub use config::AppConfig;
pub use loader::load_datasets;

/// Errors that can occur while loading configuration or datasets.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// The config file is not valid TOML or does not match the schema.
    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The data is well-formed but not what the loader expects.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of the problem.
        message: String,
    },
}

impl From<geojson::Error> for IngestError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}

/// The five collections a session loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// District boundaries with crime statistics.
    Districts,
    /// Land-use areas of the territorial plan.
    Areas,
    /// Cadastral blocks with valuations.
    Blocks,
    /// Transit station groups.
    Transit,
    /// School groups.
    Schools,
}
