#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate reference and feature layer types.
//!
//! These types carry the coordinate reference of a loaded collection
//! alongside its records so that every spatial operation can check the
//! reference explicitly instead of assuming one.

use geo::Coord;
use serde::{Deserialize, Serialize};

/// EPSG code for WGS84 longitude/latitude.
pub const EPSG_WGS84: u32 = 4326;

/// EPSG code for MAGNA-SIRGAS / Colombia Bogota zone.
pub const EPSG_MAGNA_BOGOTA: u32 = 3116;

/// A coordinate reference system supported by the valuation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crs {
    /// Geographic longitude/latitude in degrees (EPSG:4326).
    Wgs84,
    /// Planar Transverse Mercator in meters centred on Bogotá (EPSG:3116).
    MagnaBogota,
}

impl Crs {
    /// The geographic reference used for display and area-of-interest input.
    pub const GEOGRAPHIC: Self = Self::Wgs84;

    /// The metric reference used for distances and buffers.
    pub const METRIC: Self = Self::MagnaBogota;

    /// Returns the EPSG code of this reference.
    #[must_use]
    pub const fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => EPSG_WGS84,
            Self::MagnaBogota => EPSG_MAGNA_BOGOTA,
        }
    }

    /// Returns the PROJ.4 definition of this reference.
    #[must_use]
    pub const fn proj_string(self) -> &'static str {
        match self {
            Self::Wgs84 => "+proj=longlat +datum=WGS84 +no_defs",
            Self::MagnaBogota => {
                "+proj=tmerc +lat_0=4.596200416666666 +lon_0=-74.07750791666666 +k=1 \
                 +x_0=1000000 +y_0=1000000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 \
                 +units=m +no_defs"
            }
        }
    }

    /// Whether coordinates in this reference are angles (degrees).
    #[must_use]
    pub const fn is_geographic(self) -> bool {
        matches!(self, Self::Wgs84)
    }

    /// Parses a reference from an EPSG code.
    #[must_use]
    pub const fn from_epsg(code: u32) -> Option<Self> {
        match code {
            EPSG_WGS84 => Some(Self::Wgs84),
            EPSG_MAGNA_BOGOTA => Some(Self::MagnaBogota),
            _ => None,
        }
    }

    /// Parses a reference name as found in a `GeoJSON` legacy `crs` member.
    ///
    /// Accepts `EPSG:4326`, `urn:ogc:def:crs:EPSG::3116`,
    /// `urn:ogc:def:crs:OGC:1.3:CRS84` and similar spellings.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Some(Self::Wgs84);
        }

        let code = upper.rsplit(':').next()?.parse::<u32>().ok()?;
        Self::from_epsg(code)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// A record that carries a geometry.
pub trait Feature {
    /// The geometry type of this record.
    type Geometry;

    /// Returns the record's geometry.
    fn geometry(&self) -> &Self::Geometry;
}

/// A loaded collection of records sharing one coordinate reference.
///
/// `crs` is `None` when the source declared a reference this system cannot
/// interpret; spatial operations on such a layer fail instead of guessing.
#[derive(Debug, Clone)]
pub struct Layer<T> {
    crs: Option<Crs>,
    features: Vec<T>,
}

impl<T> Layer<T> {
    /// Creates a layer with an assigned reference.
    #[must_use]
    pub const fn new(crs: Crs, features: Vec<T>) -> Self {
        Self {
            crs: Some(crs),
            features,
        }
    }

    /// Creates a layer whose reference is unknown.
    #[must_use]
    pub const fn unreferenced(features: Vec<T>) -> Self {
        Self {
            crs: None,
            features,
        }
    }

    /// Creates a layer from an optional reference.
    #[must_use]
    pub const fn with_crs(crs: Option<Crs>, features: Vec<T>) -> Self {
        Self { crs, features }
    }

    /// The layer's coordinate reference, if any.
    #[must_use]
    pub const fn crs(&self) -> Option<Crs> {
        self.crs
    }

    /// The records in source order.
    #[must_use]
    pub fn features(&self) -> &[T] {
        &self.features
    }

    /// Iterates over the records in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.features.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the layer has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Layer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// A geographic coordinate, serialized as a `[lon, lat]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl From<Coord<f64>> for LonLat {
    fn from(c: Coord<f64>) -> Self {
        Self { lon: c.x, lat: c.y }
    }
}

impl From<geo::Point<f64>> for LonLat {
    fn from(p: geo::Point<f64>) -> Self {
        Self {
            lon: p.x(),
            lat: p.y(),
        }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(value: LonLat) -> Self {
        [value.lon, value.lat]
    }
}
