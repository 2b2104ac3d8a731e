//! The current value plus four projected half-year values.

use avm_valuation_models::results::{ProjectionPoint, ProjectionSeries};
use avm_valuation_models::{AnalysisConfig, Block};

/// Builds the labelled projection series of a block.
///
/// The series is all or nothing: if any of the five values is missing the
/// result is [`ProjectionSeries::Incomplete`] listing the missing periods,
/// and consumers leave the projection out entirely.
#[must_use]
pub fn build_series(block: &Block, config: &AnalysisConfig) -> ProjectionSeries {
    let [first, second, third, fourth] = config.projection_labels();
    let labels = [
        config.current_period_label.clone(),
        first,
        second,
        third,
        fourth,
    ];

    let missing: Vec<String> = labels
        .iter()
        .zip(block.value_series())
        .filter(|(_, value)| value.is_none())
        .map(|(label, _)| label.clone())
        .collect();

    if !missing.is_empty() {
        log::debug!("Block {}: projection incomplete, missing {missing:?}", block.id);
        return ProjectionSeries::Incomplete { missing };
    }

    let points = labels
        .into_iter()
        .zip(block.value_series())
        .filter_map(|(label, value)| value.map(|value| ProjectionPoint { label, value }))
        .collect();

    ProjectionSeries::Complete { points }
}
