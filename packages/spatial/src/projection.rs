//! Reprojection between WGS84 and the Bogotá metric grid.
//!
//! Uses `proj4rs` with the EPSG proj strings from [`Crs::proj_string`].
//! Geographic coordinates are converted to radians on the way in and back
//! to degrees on the way out, as `proj4rs` expects.

use avm_spatial_models::Crs;
use geo::{Centroid, Coord, MapCoords, Point, Polygon};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

use crate::SpatialError;

/// A reusable transformer between two coordinate references.
pub struct Reprojector {
    source: Crs,
    target: Crs,
    source_proj: Proj,
    target_proj: Proj,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl Reprojector {
    /// Creates a transformer from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Projection`] if either proj string fails to
    /// initialize.
    pub fn new(source: Crs, target: Crs) -> Result<Self, SpatialError> {
        let source_proj = Proj::from_proj_string(source.proj_string()).map_err(|e| {
            SpatialError::Projection {
                message: format!("Invalid source projection {source}: {e:?}"),
            }
        })?;
        let target_proj = Proj::from_proj_string(target.proj_string()).map_err(|e| {
            SpatialError::Projection {
                message: format!("Invalid target projection {target}: {e:?}"),
            }
        })?;

        Ok(Self {
            source,
            target,
            source_proj,
            target_proj,
        })
    }

    /// Transforms a single coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Projection`] if the transformation fails.
    pub fn transform_coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, SpatialError> {
        if self.source == self.target {
            return Ok(coord);
        }

        let (x, y) = if self.source.is_geographic() {
            (coord.x.to_radians(), coord.y.to_radians())
        } else {
            (coord.x, coord.y)
        };

        let mut point = (x, y, 0.0);
        transform(&self.source_proj, &self.target_proj, &mut point).map_err(|e| {
            SpatialError::Projection {
                message: format!(
                    "Transform {} -> {} failed at ({}, {}): {e:?}",
                    self.source, self.target, coord.x, coord.y
                ),
            }
        })?;

        Ok(if self.target.is_geographic() {
            Coord {
                x: point.0.to_degrees(),
                y: point.1.to_degrees(),
            }
        } else {
            Coord {
                x: point.0,
                y: point.1,
            }
        })
    }

    /// Transforms every coordinate of a geometry.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Projection`] if any coordinate fails.
    pub fn transform<G>(&self, geometry: &G) -> Result<G, SpatialError>
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        geometry.try_map_coords(|coord| self.transform_coord(coord))
    }
}

/// Projects a geometry from `source` into `target`.
///
/// Used to bring a WGS84 area of interest into the reference of the layer
/// it is tested against.
///
/// # Errors
///
/// * [`SpatialError::MissingReference`] if either reference is `None`
/// * [`SpatialError::Projection`] if the transformation fails
pub fn to_crs<G>(
    geometry: &G,
    source: Option<Crs>,
    target: Option<Crs>,
) -> Result<G, SpatialError>
where
    G: MapCoords<f64, f64, Output = G>,
{
    let source = source.ok_or(SpatialError::MissingReference)?;
    let target = target.ok_or(SpatialError::MissingReference)?;
    Reprojector::new(source, target)?.transform(geometry)
}

/// Projects a geometry into the metric grid (EPSG:3116).
///
/// # Errors
///
/// * [`SpatialError::MissingReference`] if `source` is `None`
/// * [`SpatialError::Projection`] if the transformation fails
pub fn to_metric<G>(geometry: &G, source: Option<Crs>) -> Result<G, SpatialError>
where
    G: MapCoords<f64, f64, Output = G>,
{
    to_crs(geometry, source, Some(Crs::METRIC))
}

/// Projects a geometry into WGS84 longitude/latitude.
///
/// # Errors
///
/// * [`SpatialError::MissingReference`] if `source` is `None`
/// * [`SpatialError::Projection`] if the transformation fails
pub fn to_geographic<G>(geometry: &G, source: Option<Crs>) -> Result<G, SpatialError>
where
    G: MapCoords<f64, f64, Output = G>,
{
    to_crs(geometry, source, Some(Crs::GEOGRAPHIC))
}

/// Computes a polygon's centroid in the metric grid and returns it in
/// WGS84, avoiding the distortion of averaging angles.
///
/// # Errors
///
/// * [`SpatialError::MissingReference`] if `source` is `None`
/// * [`SpatialError::EmptyGeometry`] if the polygon has no centroid
/// * [`SpatialError::Projection`] if a transformation fails
pub fn metric_centroid(
    polygon: &Polygon<f64>,
    source: Option<Crs>,
) -> Result<Point<f64>, SpatialError> {
    let metric = to_metric(polygon, source)?;
    let centroid = metric.centroid().ok_or(SpatialError::EmptyGeometry)?;
    to_geographic(&centroid, Some(Crs::METRIC))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{BoundingRect, polygon};

    const TOLERANCE_DEG: f64 = 1e-6;

    #[test]
    fn origin_maps_to_false_origin() {
        let origin = Point::new(-74.077_507_916_666_66, 4.596_200_416_666_666);
        let metric = to_metric(&origin, Some(Crs::Wgs84)).unwrap();
        assert!((metric.x() - 1_000_000.0).abs() < 0.01, "x = {}", metric.x());
        assert!((metric.y() - 1_000_000.0).abs() < 0.01, "y = {}", metric.y());
    }

    #[test]
    fn roundtrip_is_submeter() {
        let points = [
            Point::new(-74.0817, 4.6097),
            Point::new(-74.1500, 4.5200),
            Point::new(-74.0300, 4.7500),
        ];

        for p in points {
            let metric = to_metric(&p, Some(Crs::Wgs84)).unwrap();
            let back = to_geographic(&metric, Some(Crs::MagnaBogota)).unwrap();
            assert!((back.x() - p.x()).abs() < TOLERANCE_DEG, "lon drift at {p:?}");
            assert!((back.y() - p.y()).abs() < TOLERANCE_DEG, "lat drift at {p:?}");
        }
    }

    #[test]
    fn metric_units_are_meters() {
        let a = Point::new(1_000_000.0, 1_000_000.0);
        let b = Point::new(1_000_000.0, 1_001_000.0);
        let a_geo = to_geographic(&a, Some(Crs::MagnaBogota)).unwrap();
        let b_geo = to_geographic(&b, Some(Crs::MagnaBogota)).unwrap();

        // One degree of latitude is roughly 110.6 km near Bogotá.
        let expected = 1000.0 / 110_600.0;
        assert!(((b_geo.y() - a_geo.y()) - expected).abs() < 1e-4);
        assert!((b_geo.x() - a_geo.x()).abs() < 1e-6);
    }

    #[test]
    fn missing_reference_fails() {
        let p = Point::new(-74.08, 4.6);
        assert!(matches!(
            to_metric(&p, None),
            Err(SpatialError::MissingReference)
        ));
        assert!(matches!(
            to_geographic(&p, None),
            Err(SpatialError::MissingReference)
        ));
    }

    #[test]
    fn to_crs_requires_both_references() {
        let p = Point::new(-74.08, 4.6);
        assert!(matches!(
            to_crs(&p, Some(Crs::Wgs84), None),
            Err(SpatialError::MissingReference)
        ));

        let metric = to_crs(&p, Some(Crs::Wgs84), Some(Crs::MagnaBogota)).unwrap();
        assert_eq!(metric, to_metric(&p, Some(Crs::Wgs84)).unwrap());
    }

    #[test]
    fn same_reference_is_identity() {
        let p = Point::new(1_000_123.5, 999_870.25);
        let out = to_metric(&p, Some(Crs::MagnaBogota)).unwrap();
        assert_eq!(out, p);
    }

    #[test]
    fn polygon_projection_keeps_shape() {
        let block = polygon![
            (x: -74.0820, y: 4.6090),
            (x: -74.0815, y: 4.6090),
            (x: -74.0815, y: 4.6095),
            (x: -74.0820, y: 4.6095),
            (x: -74.0820, y: 4.6090),
        ];
        let metric = to_metric(&block, Some(Crs::Wgs84)).unwrap();
        let rect = metric.bounding_rect().unwrap();

        // 0.0005 degrees is a little over 55 m at this latitude.
        assert!((rect.width() - 55.5).abs() < 1.0, "width = {}", rect.width());
        assert!((rect.height() - 55.3).abs() < 1.0, "height = {}", rect.height());
    }

    #[test]
    fn centroid_is_inside_block() {
        let block = polygon![
            (x: -74.0820, y: 4.6090),
            (x: -74.0810, y: 4.6090),
            (x: -74.0810, y: 4.6100),
            (x: -74.0820, y: 4.6100),
            (x: -74.0820, y: 4.6090),
        ];
        let centroid = metric_centroid(&block, Some(Crs::Wgs84)).unwrap();
        assert!((centroid.x() - -74.0815).abs() < 1e-5);
        assert!((centroid.y() - 4.6095).abs() < 1e-5);
    }
}
