//! Small in-memory datasets in Bogotá coordinates.
//!
//! Blocks are 0.0005° squares (about 55 m) laid out eastward from
//! `BASE_LON` in 0.001° (about 110 m) steps, so gaps between blocks are
//! easy to reason about in meters:
//!
//! | block | step | gap to M1 | area | value |
//! |-------|------|-----------|------|-------|
//! | M1    | 0    | -         | A1   | 100   |
//! | M2    | 1    | ~55 m     | A1   | 200   |
//! | M3    | 2    | ~165 m    | A2   | 300   |
//! | M5    | 4    | ~390 m    | A3   | null  |
//! | M4    | 10   | ~1 km     | none | 400   |

use avm_spatial::to_metric;
use avm_spatial_models::{Crs, Layer};
use avm_valuation_models::{Area, Block, Datasets, District, GroupGeometry, PointGroup};
use geo::{MultiPoint, MultiPolygon, Point, Polygon, polygon};

pub const BASE_LON: f64 = -74.0820;
pub const BASE_LAT: f64 = 4.6090;
const BLOCK_SIZE: f64 = 0.0005;
const STEP: f64 = 0.001;

fn square(lon: f64, lat: f64, size: f64) -> Polygon<f64> {
    polygon![
        (x: lon, y: lat),
        (x: lon + size, y: lat),
        (x: lon + size, y: lat + size),
        (x: lon, y: lat + size),
        (x: lon, y: lat),
    ]
}

pub fn block(
    id: &str,
    district_code: u32,
    area_id: Option<&str>,
    value_m2: Option<f64>,
    step: f64,
) -> Block {
    Block {
        id: id.to_string(),
        district_code,
        area_id: area_id.map(str::to_string),
        geometry: square(BASE_LON + step * STEP, BASE_LAT, BLOCK_SIZE),
        value_m2,
        projected_values: [None; 4],
        stratum: Some(4),
        profitability: Some("Media".to_string()),
        transit_group: None,
        school_group: None,
        nearby_schools: Some(2),
        nearby_stations: Some(1),
    }
}

fn district(code: u32, name: &str, crime_count: u64, risk_level: &str, lon: f64) -> District {
    District {
        code,
        name: name.to_string(),
        crime_count,
        risk_level: risk_level.to_string(),
        geometry: MultiPolygon(vec![square(lon, BASE_LAT - 0.01, 0.03)]),
    }
}

fn area(id: &str, district_code: u32, land_use: Option<&str>) -> Area {
    Area {
        id: id.to_string(),
        district_code,
        land_use: land_use.map(str::to_string),
        zone_label: Some(format!("Zona {id}")),
        zone_plan_id: None,
    }
}

pub fn districts() -> Vec<District> {
    vec![
        district(5, "Teusaquillo", 3000, "Medio", BASE_LON - 0.005),
        district(6, "Chapinero", 1500, "Bajo", BASE_LON + 0.1),
        district(7, "Kennedy", 9000, "Alto", BASE_LON + 0.2),
    ]
}

pub fn blocks() -> Vec<Block> {
    let mut m1 = block("M1", 5, Some("A1"), Some(100.0), 0.0);
    m1.projected_values = [Some(110.0), Some(120.0), Some(125.0), Some(130.0)];
    m1.transit_group = Some("T1".to_string());
    m1.school_group = Some("S1".to_string());

    let mut m2 = block("M2", 5, Some("A1"), Some(200.0), 1.0);
    m2.projected_values = [Some(210.0), None, Some(230.0), Some(240.0)];

    let mut m3 = block("M3", 5, Some("A2"), Some(300.0), 2.0);
    m3.transit_group = Some("T9".to_string());
    m3.school_group = Some("S2".to_string());

    vec![
        m1,
        m2,
        m3,
        block("M4", 5, None, Some(400.0), 10.0),
        block("M5", 5, Some("A3"), None, 4.0),
        block("N1", 6, Some("B1"), Some(900.0), 100.0),
    ]
}

pub fn datasets() -> Datasets {
    let areas = vec![
        area("A1", 5, Some("Residencial")),
        area("A2", 5, Some("Comercial")),
        area("A3", 5, None),
        area("B1", 6, Some("Industrial")),
    ];

    let transit = vec![
        PointGroup {
            group_id: "T1".to_string(),
            geometry: GroupGeometry::MultiPoint(MultiPoint(vec![
                Point::new(BASE_LON + 0.002, BASE_LAT + 0.003),
                Point::new(BASE_LON - 0.003, BASE_LAT),
                Point::new(BASE_LON, BASE_LAT - 0.004),
            ])),
        },
        PointGroup {
            group_id: "T2".to_string(),
            geometry: GroupGeometry::Point(Point::new(BASE_LON + 0.1, BASE_LAT)),
        },
    ];

    let schools = vec![
        PointGroup {
            group_id: "S1".to_string(),
            geometry: GroupGeometry::Point(Point::new(BASE_LON + 0.005, BASE_LAT)),
        },
        PointGroup {
            group_id: "S2".to_string(),
            geometry: GroupGeometry::Point(Point::new(BASE_LON + 0.006, BASE_LAT)),
        },
        PointGroup {
            group_id: "S1".to_string(),
            geometry: GroupGeometry::Point(Point::new(BASE_LON, BASE_LAT + 0.006)),
        },
    ];

    Datasets {
        districts: Layer::new(Crs::Wgs84, districts()),
        areas: Layer::new(Crs::Wgs84, areas),
        blocks: Layer::new(Crs::Wgs84, blocks()),
        transit: Layer::new(Crs::Wgs84, transit),
        schools: Layer::new(Crs::Wgs84, schools),
    }
}

/// The block fixtures projected into the metric grid.
pub fn metric_blocks() -> Layer<Block> {
    let blocks = blocks()
        .into_iter()
        .map(|mut block| {
            block.geometry = to_metric(&block.geometry, Some(Crs::Wgs84)).unwrap();
            block
        })
        .collect();
    Layer::new(Crs::MagnaBogota, blocks)
}

/// The district fixtures projected into the metric grid.
pub fn metric_districts() -> Layer<District> {
    let districts = districts()
        .into_iter()
        .map(|mut district| {
            district.geometry = to_metric(&district.geometry, Some(Crs::Wgs84)).unwrap();
            district
        })
        .collect();
    Layer::new(Crs::MagnaBogota, districts)
}
