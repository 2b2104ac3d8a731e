//! Converts `GeoJSON` `FeatureCollection`s into typed layers.
//!
//! Each collection keeps the coordinate reference it declares. A missing
//! legacy `crs` member means WGS84 (the `GeoJSON` default); a `crs` member
//! naming a reference this system does not know yields an unreferenced
//! layer, so spatial operations on it fail instead of guessing.

use std::sync::Arc;

use avm_spatial_models::{Crs, Layer};
use avm_valuation_models::{Area, Block, Datasets, District, GroupGeometry, PointGroup};
use geo::{Area as _, Geometry, MultiPolygon, Polygon};
use geojson::{GeoJson, JsonObject};
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::config::{AppConfig, AreaFields, BlockFields, DistrictFields, GroupFields};
use crate::normalize::{read_f64, read_id, read_integer, read_text};
use crate::progress::LoadProgress;
use crate::{DatasetKind, IngestError};

/// Why a single feature was skipped.
#[derive(Debug, thiserror::Error)]
enum RecordError {
    #[error("missing or invalid property '{0}'")]
    Property(String),
    #[error("missing geometry")]
    NoGeometry,
    #[error("unsupported geometry type {0}")]
    GeometryType(&'static str),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

fn required<T>(value: Option<T>, key: &str) -> Result<T, RecordError> {
    value.ok_or_else(|| RecordError::Property(key.to_string()))
}

/// Loads all five datasets named in `config`, announcing each one to
/// `progress` before it is read and after it is parsed.
///
/// # Errors
///
/// * [`IngestError::Io`] if a file cannot be read
/// * [`IngestError::GeoJson`] if a file is not valid `GeoJSON`
/// * [`IngestError::Conversion`] if a file is not a `FeatureCollection`
pub fn load_datasets(
    config: &AppConfig,
    progress: &Arc<dyn LoadProgress>,
) -> Result<Datasets, IngestError> {
    progress.start(DatasetKind::iter().count());

    let read = |kind: DatasetKind| -> Result<String, IngestError> {
        let path = config.datasets.path(kind);
        progress.reading(kind, path);
        log::debug!("Reading {kind} from {}", path.display());
        std::fs::read_to_string(path).map_err(|e| {
            log::error!("Failed to read {}: {e}", path.display());
            IngestError::Io(e)
        })
    };

    let fields = &config.fields;
    let kind = DatasetKind::Districts;
    let districts = parse_districts(&read(kind)?, &fields.districts)?;
    progress.loaded(kind, districts.len());

    let kind = DatasetKind::Areas;
    let areas = parse_areas(&read(kind)?, &fields.areas)?;
    progress.loaded(kind, areas.len());

    let kind = DatasetKind::Blocks;
    let blocks = parse_blocks(&read(kind)?, &fields.blocks)?;
    progress.loaded(kind, blocks.len());

    let kind = DatasetKind::Transit;
    let transit = parse_point_groups(&read(kind)?, kind, &fields.transit)?;
    progress.loaded(kind, transit.len());

    let kind = DatasetKind::Schools;
    let schools = parse_point_groups(&read(kind)?, kind, &fields.schools)?;
    progress.loaded(kind, schools.len());

    progress.finish(&format!(
        "Loaded {} districts and {} blocks",
        districts.len(),
        blocks.len()
    ));

    Ok(Datasets {
        districts,
        areas,
        blocks,
        transit,
        schools,
    })
}

/// Parses the districts collection.
///
/// # Errors
///
/// Returns an error if the text is not a `GeoJSON` `FeatureCollection`.
pub fn parse_districts(
    text: &str,
    fields: &DistrictFields,
) -> Result<Layer<District>, IngestError> {
    parse_layer(text, DatasetKind::Districts, |props, geometry| {
        Ok(District {
            code: required(read_integer(props, &fields.code), &fields.code)?,
            name: required(read_text(props, &fields.name), &fields.name)?,
            crime_count: required(read_integer(props, &fields.crime_count), &fields.crime_count)?,
            risk_level: required(read_text(props, &fields.risk_level), &fields.risk_level)?,
            geometry: multi_polygon(geometry)?,
        })
    })
}

/// Parses the land-use areas collection. Area geometries are not kept.
///
/// # Errors
///
/// Returns an error if the text is not a `GeoJSON` `FeatureCollection`.
pub fn parse_areas(text: &str, fields: &AreaFields) -> Result<Layer<Area>, IngestError> {
    parse_layer(text, DatasetKind::Areas, |props, _| {
        Ok(Area {
            id: required(read_id(props, &fields.id), &fields.id)?,
            district_code: required(
                read_integer(props, &fields.district_code),
                &fields.district_code,
            )?,
            land_use: read_text(props, &fields.land_use),
            zone_label: read_text(props, &fields.zone_label),
            zone_plan_id: read_id(props, &fields.zone_plan_id),
        })
    })
}

/// Parses the blocks collection. Multi-part blocks keep their largest part.
///
/// # Errors
///
/// Returns an error if the text is not a `GeoJSON` `FeatureCollection`.
pub fn parse_blocks(text: &str, fields: &BlockFields) -> Result<Layer<Block>, IngestError> {
    parse_layer(text, DatasetKind::Blocks, |props, geometry| {
        let [p1, p2, p3, p4] = &fields.projected_values;
        Ok(Block {
            id: required(read_id(props, &fields.id), &fields.id)?,
            district_code: required(
                read_integer(props, &fields.district_code),
                &fields.district_code,
            )?,
            area_id: read_id(props, &fields.area_id),
            geometry: largest_polygon(geometry)?,
            value_m2: read_f64(props, &fields.value_m2),
            projected_values: [
                read_f64(props, p1),
                read_f64(props, p2),
                read_f64(props, p3),
                read_f64(props, p4),
            ],
            stratum: read_integer(props, &fields.stratum),
            profitability: read_text(props, &fields.profitability),
            transit_group: read_id(props, &fields.transit_group),
            school_group: read_id(props, &fields.school_group),
            nearby_schools: read_integer(props, &fields.nearby_schools),
            nearby_stations: read_integer(props, &fields.nearby_stations),
        })
    })
}

/// Parses a transit or school collection.
///
/// # Errors
///
/// Returns an error if the text is not a `GeoJSON` `FeatureCollection`.
pub fn parse_point_groups(
    text: &str,
    kind: DatasetKind,
    fields: &GroupFields,
) -> Result<Layer<PointGroup>, IngestError> {
    parse_layer(text, kind, |props, geometry| {
        let geometry = match geometry.ok_or(RecordError::NoGeometry)? {
            Geometry::Point(p) => GroupGeometry::Point(p),
            Geometry::MultiPoint(mp) if !mp.0.is_empty() => GroupGeometry::MultiPoint(mp),
            Geometry::MultiPoint(_) => return Err(RecordError::NoGeometry),
            other => return Err(RecordError::GeometryType(geometry_name(&other))),
        };
        Ok(PointGroup {
            group_id: required(read_id(props, &fields.group_id), &fields.group_id)?,
            geometry,
        })
    })
}

fn parse_layer<T>(
    text: &str,
    kind: DatasetKind,
    convert: impl Fn(&JsonObject, Option<Geometry<f64>>) -> Result<T, RecordError>,
) -> Result<Layer<T>, IngestError> {
    let GeoJson::FeatureCollection(collection) = text.parse::<GeoJson>()? else {
        return Err(IngestError::Conversion {
            message: format!("{kind}: expected a FeatureCollection"),
        });
    };

    let crs = declared_crs(collection.foreign_members.as_ref(), kind);
    let total = collection.features.len();
    let mut records = Vec::with_capacity(total);

    for (index, feature) in collection.features.into_iter().enumerate() {
        let props = feature.properties.unwrap_or_default();
        let record = feature
            .geometry
            .map(Geometry::<f64>::try_from)
            .transpose()
            .map_err(|e| RecordError::InvalidGeometry(e.to_string()))
            .and_then(|geometry| convert(&props, geometry));

        match record {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping {kind} feature #{index}: {e}"),
        }
    }

    log::info!(
        "Loaded {} of {total} {kind} ({})",
        records.len(),
        crs.map_or_else(|| "unknown reference".to_string(), |c| c.to_string())
    );

    Ok(Layer::with_crs(crs, records))
}

/// Reads the legacy `crs` member of a collection.
fn declared_crs(foreign_members: Option<&JsonObject>, kind: DatasetKind) -> Option<Crs> {
    let Some(member) = foreign_members.and_then(|m| m.get("crs")) else {
        return Some(Crs::Wgs84);
    };

    let properties = member.get("properties");
    let crs = properties
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .and_then(Crs::from_name)
        .or_else(|| {
            properties
                .and_then(|p| p.get("code"))
                .and_then(Value::as_u64)
                .and_then(|code| u32::try_from(code).ok())
                .and_then(Crs::from_epsg)
        });

    if crs.is_none() {
        log::warn!("{kind}: unrecognized coordinate reference {member}");
    }
    crs
}

fn multi_polygon(geometry: Option<Geometry<f64>>) -> Result<MultiPolygon<f64>, RecordError> {
    match geometry.ok_or(RecordError::NoGeometry)? {
        Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        Geometry::MultiPolygon(mp) if !mp.0.is_empty() => Ok(mp),
        Geometry::MultiPolygon(_) => Err(RecordError::NoGeometry),
        other => Err(RecordError::GeometryType(geometry_name(&other))),
    }
}

fn largest_polygon(geometry: Option<Geometry<f64>>) -> Result<Polygon<f64>, RecordError> {
    multi_polygon(geometry)?
        .0
        .into_iter()
        .max_by(|a, b| a.unsigned_area().total_cmp(&b.unsigned_area()))
        .ok_or(RecordError::NoGeometry)
}

const fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
