//! Crime ranking of all districts with the selected district highlighted.

use avm_spatial_models::Layer;
use avm_valuation_models::District;
use avm_valuation_models::results::{SecurityContext, SecurityRow};

use crate::ValuationError;
use crate::district::find_district;

/// Ranks every district by reported crime, ascending, and marks the
/// district with `district_code` as current. Only the current row carries
/// a label (its risk level).
///
/// # Errors
///
/// Returns [`ValuationError::DistrictNotFound`] if no district has the
/// code. No placeholder row is substituted.
pub fn security_context(
    districts: &Layer<District>,
    district_code: u32,
) -> Result<SecurityContext, ValuationError> {
    let current = find_district(districts, district_code)?;

    let mut ranking: Vec<SecurityRow> = districts
        .iter()
        .map(|d| {
            let is_current = d.code == current.code;
            SecurityRow {
                code: d.code,
                name: d.name.clone(),
                crime_count: d.crime_count,
                risk_level: d.risk_level.clone(),
                is_current,
                label: if is_current {
                    d.risk_level.clone()
                } else {
                    String::new()
                },
            }
        })
        .collect();
    ranking.sort_by_key(|row| row.crime_count);

    let current = ranking
        .iter()
        .find(|row| row.is_current)
        .cloned()
        .ok_or(ValuationError::DistrictNotFound {
            code: district_code,
        })?;

    Ok(SecurityContext { ranking, current })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use avm_spatial_models::Crs;

    #[test]
    fn ranks_ascending_and_highlights_current() {
        let districts = Layer::new(Crs::Wgs84, fixtures::districts());
        let context = security_context(&districts, 5).unwrap();

        let names: Vec<&str> = context.ranking.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Chapinero", "Teusaquillo", "Kennedy"]);

        let labels: Vec<&str> = context.ranking.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["", "Medio", ""]);

        assert_eq!(context.current.code, 5);
        assert!(context.current.is_current);
        assert_eq!(context.ranking.iter().filter(|r| r.is_current).count(), 1);
    }

    #[test]
    fn unknown_district_is_an_error() {
        let districts = Layer::new(Crs::Wgs84, fixtures::districts());
        assert!(matches!(
            security_context(&districts, 99),
            Err(ValuationError::DistrictNotFound { code: 99 })
        ));
    }

    #[test]
    fn ties_keep_source_order() {
        let mut list = fixtures::districts();
        for d in &mut list {
            d.crime_count = 10;
        }
        let districts = Layer::new(Crs::Wgs84, list);
        let context = security_context(&districts, 7).unwrap();
        let codes: Vec<u32> = context.ranking.iter().map(|r| r.code).collect();
        assert_eq!(codes, vec![5, 6, 7]);
    }
}
