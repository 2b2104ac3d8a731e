//! Attribute and geometric filters over feature collections.
//!
//! Every filter preserves the source order of the collection and returns
//! an empty result (never an error) when nothing matches.

use avm_spatial_models::{Crs, Feature};
use geo::{Area, BoundingRect, Buffer, Contains, Intersects, MapCoords, Point, Polygon, Rect};

use crate::SpatialError;
use crate::projection::{to_geographic, to_metric};

/// Returns every record whose key equals `value`, in source order.
///
/// The key extractor may return an `Option`, in which case `None` matches
/// `None`. Callers that want null-excluding semantics filter the key first.
pub fn filter_by_attribute<'a, T, K, F>(
    collection: impl IntoIterator<Item = &'a T>,
    key: F,
    value: &K,
) -> Vec<&'a T>
where
    T: 'a,
    K: PartialEq,
    F: Fn(&'a T) -> K,
{
    collection
        .into_iter()
        .filter(|record| key(record) == *value)
        .collect()
}

/// Buffers a geometry by `radius_m` meters.
///
/// The geometry is projected into the metric grid, buffered with round
/// joins and projected back to WGS84. When the buffer has several parts
/// the largest one is returned.
///
/// # Errors
///
/// * [`SpatialError::InvalidRadius`] if the radius is not positive and finite
/// * [`SpatialError::MissingReference`] if `crs` is `None`
/// * [`SpatialError::EmptyBuffer`] if buffering produced nothing
/// * [`SpatialError::Projection`] if a transformation fails
pub fn buffer_around_geometry<G>(
    geometry: &G,
    crs: Option<Crs>,
    radius_m: f64,
) -> Result<Polygon<f64>, SpatialError>
where
    G: MapCoords<f64, f64, Output = G> + Buffer<Scalar = f64>,
{
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(SpatialError::InvalidRadius { radius: radius_m });
    }

    let metric = to_metric(geometry, crs)?;
    let buffered = metric.buffer(radius_m);

    let largest = buffered
        .0
        .into_iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .ok_or(SpatialError::EmptyBuffer)?;

    log::trace!(
        "Buffered geometry by {radius_m} m ({} exterior vertices)",
        largest.exterior().0.len()
    );

    to_geographic(&largest, Some(Crs::METRIC))
}

/// Returns every record whose geometry intersects `area_of_interest`.
///
/// Intersection is closed: a record that only touches the boundary of the
/// area of interest is included. Records with empty geometries never match.
pub fn filter_by_intersection<'a, T>(
    collection: impl IntoIterator<Item = &'a T>,
    area_of_interest: &Polygon<f64>,
) -> Vec<&'a T>
where
    T: Feature + 'a,
    T::Geometry: Intersects<Polygon<f64>> + BoundingRect<f64>,
    <T::Geometry as BoundingRect<f64>>::Output: Into<Option<Rect<f64>>>,
{
    let Some(aoi_rect) = area_of_interest.bounding_rect() else {
        return Vec::new();
    };

    collection
        .into_iter()
        .filter(|record| {
            let geometry = record.geometry();
            let rect: Option<Rect<f64>> = geometry.bounding_rect().into();
            let Some(rect) = rect else {
                return false;
            };
            rect.intersects(&aoi_rect) && geometry.intersects(area_of_interest)
        })
        .collect()
}

/// Returns the first record whose geometry contains `point`.
///
/// Used to resolve a clicked coordinate to the district under it.
pub fn filter_by_containment<'a, T>(
    collection: impl IntoIterator<Item = &'a T>,
    point: &Point<f64>,
) -> Option<&'a T>
where
    T: Feature + 'a,
    T::Geometry: Contains<Point<f64>>,
{
    collection
        .into_iter()
        .find(|record| record.geometry().contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, polygon};

    struct Parcel {
        id: &'static str,
        group: Option<&'static str>,
        geometry: Polygon<f64>,
    }

    impl Feature for Parcel {
        type Geometry = Polygon<f64>;

        fn geometry(&self) -> &Polygon<f64> {
            &self.geometry
        }
    }

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ]
    }

    fn parcels() -> Vec<Parcel> {
        vec![
            Parcel {
                id: "inside",
                group: Some("a"),
                geometry: square(0.2, 0.2, 0.5),
            },
            Parcel {
                id: "far",
                group: None,
                geometry: square(5.0, 5.0, 1.0),
            },
            Parcel {
                id: "touching",
                group: Some("a"),
                geometry: square(1.0, 0.0, 1.0),
            },
            Parcel {
                id: "corner",
                group: None,
                geometry: square(1.0, 1.0, 1.0),
            },
            Parcel {
                id: "gap",
                group: Some("b"),
                geometry: square(1.000_001, 2.0, 1.0),
            },
        ]
    }

    fn ids(records: &[&Parcel]) -> Vec<&'static str> {
        records.iter().map(|p| p.id).collect()
    }

    #[test]
    fn attribute_filter_preserves_order() {
        let all = parcels();
        let matched = filter_by_attribute(&all, |p| p.group, &Some("a"));
        assert_eq!(ids(&matched), vec!["inside", "touching"]);
    }

    #[test]
    fn attribute_filter_null_matches_null() {
        let all = parcels();
        let matched = filter_by_attribute(&all, |p| p.group, &None);
        assert_eq!(ids(&matched), vec!["far", "corner"]);
    }

    #[test]
    fn attribute_filter_no_match_is_empty() {
        let all = parcels();
        assert!(filter_by_attribute(&all, |p| p.group, &Some("zzz")).is_empty());
    }

    #[test]
    fn intersection_includes_boundary_contact() {
        let all = parcels();
        let aoi = square(0.0, 0.0, 1.0);
        let matched = filter_by_intersection(&all, &aoi);
        assert_eq!(ids(&matched), vec!["inside", "touching", "corner"]);
    }

    #[test]
    fn intersection_with_nothing_is_empty() {
        let all = parcels();
        let aoi = square(-10.0, -10.0, 1.0);
        assert!(filter_by_intersection(&all, &aoi).is_empty());
    }

    #[test]
    fn containment_returns_first_match() {
        let all = parcels();
        let hit = filter_by_containment(&all, &Point::new(0.3, 0.3));
        assert_eq!(hit.map(|p| p.id), Some("inside"));
        assert!(filter_by_containment(&all, &Point::new(-3.0, -3.0)).is_none());
    }

    #[test]
    fn buffer_rejects_bad_radius() {
        let block = square(-74.082, 4.609, 0.0005);
        for radius in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                buffer_around_geometry(&block, Some(Crs::Wgs84), radius),
                Err(SpatialError::InvalidRadius { .. })
            ));
        }
    }

    #[test]
    fn buffer_requires_reference() {
        let block = square(-74.082, 4.609, 0.0005);
        assert!(matches!(
            buffer_around_geometry(&block, None, 300.0),
            Err(SpatialError::MissingReference)
        ));
    }

    #[test]
    fn buffer_grows_by_radius_in_meters() {
        let block = square(-74.082, 4.609, 0.0005);
        let buffer = buffer_around_geometry(&block, Some(Crs::Wgs84), 300.0).unwrap();

        let metric_block = to_metric(&block, Some(Crs::Wgs84)).unwrap();
        let metric_buffer = to_metric(&buffer, Some(Crs::Wgs84)).unwrap();
        let block_rect = metric_block.bounding_rect().unwrap();
        let buffer_rect = metric_buffer.bounding_rect().unwrap();

        let grown = buffer_rect.width() - block_rect.width();
        assert!((grown - 600.0).abs() < 10.0, "grew by {grown} m");
        assert!(buffer.contains(&block));
    }

    #[test]
    fn buffers_are_monotonic() {
        let block = square(-74.082, 4.609, 0.0005);
        let small = buffer_around_geometry(&block, Some(Crs::Wgs84), 300.0).unwrap();
        let large = buffer_around_geometry(&block, Some(Crs::Wgs84), 500.0).unwrap();

        assert!(large.unsigned_area() > small.unsigned_area());
        assert!(large.contains(&small));
    }

    #[test]
    fn multipolygon_buffer_returns_largest_part() {
        let parts = MultiPolygon(vec![
            square(-74.082, 4.609, 0.0005),
            square(-74.000, 4.700, 0.0001),
        ]);
        let buffer = buffer_around_geometry(&parts, Some(Crs::Wgs84), 50.0).unwrap();
        assert!(buffer.contains(&square(-74.082, 4.609, 0.0005)));
    }
}
