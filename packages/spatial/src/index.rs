//! R-tree index over a collection's bounding boxes.
//!
//! Built once per district selection and queried for every buffer the
//! analysis steps draw around the selected block.

use avm_spatial_models::Feature;
use geo::{BoundingRect, Intersects, Polygon, Rect};
use rstar::{AABB, RTree, RTreeObject};

/// A record position stored in the R-tree with its envelope.
struct IndexEntry {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Bounding-box R-tree over the records of one slice.
///
/// The index stores positions, not records, so it must be queried with the
/// same slice it was built from.
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
    len: usize,
}

impl SpatialIndex {
    /// Builds an index over `records`. Records with empty geometries are
    /// left out since they cannot intersect anything.
    #[must_use]
    pub fn build<T>(records: &[T]) -> Self
    where
        T: Feature,
        T::Geometry: BoundingRect<f64>,
        <T::Geometry as BoundingRect<f64>>::Output: Into<Option<Rect<f64>>>,
    {
        let entries: Vec<IndexEntry> = records
            .iter()
            .enumerate()
            .filter_map(|(position, record)| {
                let rect: Option<Rect<f64>> = record.geometry().bounding_rect().into();
                rect.map(|rect| IndexEntry {
                    position,
                    envelope: rect_envelope(rect),
                })
            })
            .collect();

        log::debug!(
            "Built spatial index with {} of {} records",
            entries.len(),
            records.len()
        );

        Self {
            tree: RTree::bulk_load(entries),
            len: records.len(),
        }
    }

    /// Number of records the index was built from.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the index was built from an empty slice.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the records of `records` whose geometry intersects
    /// `area_of_interest`, in source order.
    ///
    /// Same result as [`crate::filter_by_intersection`] over the full slice.
    #[must_use]
    pub fn intersecting<'a, T>(
        &self,
        records: &'a [T],
        area_of_interest: &Polygon<f64>,
    ) -> Vec<&'a T>
    where
        T: Feature,
        T::Geometry: Intersects<Polygon<f64>>,
    {
        debug_assert_eq!(records.len(), self.len, "index queried with a different slice");

        let Some(aoi_rect) = area_of_interest.bounding_rect() else {
            return Vec::new();
        };

        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&rect_envelope(aoi_rect))
            .filter_map(|entry| {
                let record = records.get(entry.position)?;
                record
                    .geometry()
                    .intersects(area_of_interest)
                    .then_some(entry.position)
            })
            .collect();
        positions.sort_unstable();

        positions.into_iter().map(|i| &records[i]).collect()
    }
}

fn rect_envelope(rect: Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_by_intersection;
    use geo::polygon;

    struct Lot {
        id: usize,
        geometry: Polygon<f64>,
    }

    impl Feature for Lot {
        type Geometry = Polygon<f64>;

        fn geometry(&self) -> &Polygon<f64> {
            &self.geometry
        }
    }

    fn lot(id: usize, x: f64, y: f64) -> Lot {
        Lot {
            id,
            geometry: polygon![
                (x: x, y: y),
                (x: x + 1.0, y: y),
                (x: x + 1.0, y: y + 1.0),
                (x: x, y: y + 1.0),
                (x: x, y: y),
            ],
        }
    }

    fn grid() -> Vec<Lot> {
        let mut lots = Vec::new();
        for row in 0..10 {
            for col in 0..10 {
                // Reverse insertion order so source order differs from
                // spatial order.
                lots.push(lot(lots.len(), f64::from(9 - col) * 2.0, f64::from(row) * 2.0));
            }
        }
        lots
    }

    #[test]
    fn matches_linear_filter() {
        let lots = grid();
        let index = SpatialIndex::build(&lots);
        let aoi = polygon![
            (x: 3.0, y: 3.0),
            (x: 9.0, y: 3.0),
            (x: 9.0, y: 8.0),
            (x: 3.0, y: 8.0),
            (x: 3.0, y: 3.0),
        ];

        let indexed: Vec<usize> = index.intersecting(&lots, &aoi).iter().map(|l| l.id).collect();
        let linear: Vec<usize> = filter_by_intersection(&lots, &aoi)
            .iter()
            .map(|l| l.id)
            .collect();

        assert!(!indexed.is_empty());
        assert_eq!(indexed, linear);
    }

    #[test]
    fn boundary_contact_counts() {
        let lots = vec![lot(0, 0.0, 0.0), lot(1, 1.0, 0.0), lot(2, 3.0, 0.0)];
        let index = SpatialIndex::build(&lots);
        let aoi = polygon![
            (x: 2.0, y: 0.0),
            (x: 3.0, y: 0.0),
            (x: 3.0, y: 1.0),
            (x: 2.0, y: 1.0),
            (x: 2.0, y: 0.0),
        ];

        let ids: Vec<usize> = index.intersecting(&lots, &aoi).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_index() {
        let lots: Vec<Lot> = Vec::new();
        let index = SpatialIndex::build(&lots);
        assert!(index.is_empty());
        assert!(index.intersecting(&lots, &lot(0, 0.0, 0.0).geometry).is_empty());
    }
}
