//! Plain-text rendering of districts, blocks and block analyses.

use std::fmt::Write as _;

use avm_spatial_models::Layer;
use avm_valuation::{BlockAnalysis, DistrictSelection};
use avm_valuation_models::District;
use avm_valuation_models::results::{PeerScope, ProjectionSeries};

/// Formats a value per square meter as `$1,234,567`.
pub fn format_money(value: f64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}${grouped}")
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// One line per district: code, name, crimes and risk level.
pub fn render_districts(districts: &Layer<District>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{:>4}  {:<28} {:>8}  Risk", "Code", "Name", "Crimes")?;
    for d in districts {
        writeln!(
            out,
            "{:>4}  {:<28} {:>8}  {}",
            d.code, d.name, d.crime_count, d.risk_level
        )?;
    }
    Ok(out)
}

/// One line per block of the selection.
pub fn render_blocks(selection: &DistrictSelection<'_>) -> Result<String, std::fmt::Error> {
    let district = selection.district();
    let mut out = String::new();
    writeln!(
        out,
        "{} ({}): {} blocks",
        district.name,
        district.code,
        selection.blocks().len()
    )?;
    for block in selection.blocks() {
        writeln!(
            out,
            "  {:<16} {:<10} {:<28} {}",
            block.id(),
            or_dash(block.area_id()),
            block.land_use.label(),
            block.value_m2().map_or_else(|| "-".to_string(), format_money)
        )?;
    }
    Ok(out)
}

/// The full text report of one block.
pub fn render_analysis(analysis: &BlockAnalysis<'_>) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let sheet = &analysis.fact_sheet;

    writeln!(
        out,
        "Block {} ({}, district {})",
        sheet.block_id, sheet.district_name, analysis.district_code
    )?;
    writeln!(
        out,
        "  Stratum: {} | Profitability: {} | Zone: {}",
        or_dash(sheet.stratum),
        or_dash(sheet.profitability.as_deref()),
        or_dash(sheet.zone_label.as_deref())
    )?;
    writeln!(
        out,
        "  Schools nearby: {} | Stations nearby: {}",
        or_dash(sheet.nearby_schools),
        or_dash(sheet.nearby_stations)
    )?;
    writeln!(out, "  Land use: {}", sheet.land_use)?;

    let comparative = &analysis.comparative;
    writeln!(out)?;
    writeln!(out, "Valuation (per m²)")?;
    writeln!(
        out,
        "  Block:          {}",
        comparative
            .own_value
            .map_or_else(|| "no data".to_string(), format_money)
    )?;
    let scope = match &comparative.peer_scope {
        PeerScope::Area { area_id } => format!("area {area_id}"),
        PeerScope::Unassigned => "blocks without area".to_string(),
    };
    writeln!(
        out,
        "  Area average:   {} ({scope}, {} blocks)",
        format_money(comparative.area_peer_value),
        comparative.area_peers.len()
    )?;
    writeln!(
        out,
        "  Within {} m:   {} ({} blocks)",
        comparative.neighbor_radius_m,
        format_money(comparative.neighbor_value),
        comparative.neighbors.len()
    )?;

    let land_use = &analysis.land_use;
    writeln!(out)?;
    writeln!(
        out,
        "Land use within {} m ({} blocks, majority {})",
        land_use.radius_m, land_use.total, land_use.majority
    )?;
    for row in &land_use.counts {
        writeln!(out, "  {:<32} {:>4}", row.category.label(), row.count)?;
    }

    writeln!(out)?;
    match &analysis.projection {
        ProjectionSeries::Complete { points } => {
            writeln!(out, "Projection")?;
            for point in points {
                writeln!(out, "  {:<8} {}", point.label, format_money(point.value))?;
            }
        }
        ProjectionSeries::Incomplete { missing } => {
            writeln!(out, "Projection unavailable (missing {})", missing.join(", "))?;
        }
    }

    let proximity = &analysis.proximity;
    writeln!(out)?;
    writeln!(out, "Proximity")?;
    writeln!(
        out,
        "  Transit stations within {} m: {}",
        proximity.transit.radius_m,
        proximity.transit.points.len()
    )?;
    writeln!(
        out,
        "  Schools within {} m: {}",
        proximity.schools.radius_m,
        proximity.schools.points.len()
    )?;

    writeln!(out)?;
    writeln!(out, "Security (reported crimes, ascending)")?;
    for row in &analysis.security.ranking {
        writeln!(
            out,
            "{} {:<28} {:>8}  {}",
            if row.is_current { ">" } else { " " },
            row.name,
            row.crime_count,
            row.label
        )?;
    }

    Ok(out)
}
