//! Interactive wizard: district, then block, then the analysis report.
//!
//! Mirrors the subcommands with `dialoguer` prompts so the tool can be
//! used without memorizing flags.

use avm_valuation::{BlockAnalysis, DistrictSelection, ValuationError};
use avm_valuation_models::{AnalysisConfig, Datasets, EnrichedBlock, LandUse};
use dialoguer::{Confirm, Input, Select};

use crate::report;

/// What to do once a district is selected.
enum BlockAction {
    PickFromList,
    EnterId,
    ListBlocks,
}

impl BlockAction {
    const ALL: &[Self] = &[Self::PickFromList, Self::EnterId, Self::ListBlocks];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::PickFromList => "Pick a block by land use",
            Self::EnterId => "Enter a block id",
            Self::ListBlocks => "List all blocks",
        }
    }
}

/// Output format of the analysis.
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    const ALL: &[Self] = &[Self::Text, Self::Json];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Text => "Text report",
            Self::Json => "JSON",
        }
    }
}

/// Runs the wizard until the user declines to analyze another block.
///
/// # Errors
///
/// Returns an error if a prompt fails. A block that cannot be analyzed is
/// reported and the wizard returns to district selection.
pub fn run(datasets: &Datasets, config: &AnalysisConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut districts: Vec<_> = datasets.districts.iter().collect();
    districts.sort_by(|a, b| a.name.cmp(&b.name));

    let labels: Vec<String> = districts
        .iter()
        .map(|d| format!("{} ({})", d.name, d.code))
        .collect();

    loop {
        let idx = Select::new()
            .with_prompt("District")
            .items(&labels)
            .default(0)
            .max_length(15)
            .interact()?;

        let selection = match DistrictSelection::by_code(datasets, districts[idx].code) {
            Ok(selection) => selection,
            Err(e @ ValuationError::NoBlocksInDistrict { .. }) => {
                log::warn!("{e}");
                println!("{e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        println!(
            "{}: {} blocks, {} land-use categories",
            selection.district().name,
            selection.blocks().len(),
            selection.land_use_categories().len()
        );

        if let Some(block_id) = choose_block(&selection)? {
            let Some(analysis) = try_analyze(&selection, &block_id, config) else {
                continue;
            };
            print_analysis(&analysis)?;
        }

        if !Confirm::new()
            .with_prompt("Analyze another block?")
            .default(true)
            .interact()?
        {
            return Ok(());
        }
    }
}

fn choose_block(
    selection: &DistrictSelection<'_>,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let labels: Vec<&str> = BlockAction::ALL.iter().map(BlockAction::label).collect();

    let idx = Select::new()
        .with_prompt("How do you want to choose the block?")
        .items(&labels)
        .default(0)
        .interact()?;

    match BlockAction::ALL[idx] {
        BlockAction::PickFromList => {
            let categories = selection.land_use_categories();
            let category_labels: Vec<&str> = categories.iter().map(|c| c.label()).collect();

            let category = Select::new()
                .with_prompt("Land use")
                .items(&category_labels)
                .default(0)
                .interact()?;

            let blocks = blocks_with_land_use(selection, categories[category]);
            let block_labels: Vec<String> = blocks
                .iter()
                .map(|b| {
                    format!(
                        "{} ({})",
                        b.id(),
                        b.value_m2().map_or_else(|| "no value".to_string(), report::format_money)
                    )
                })
                .collect();

            let block = Select::new()
                .with_prompt("Block")
                .items(&block_labels)
                .default(0)
                .max_length(15)
                .interact()?;

            Ok(Some(blocks[block].id().to_string()))
        }
        BlockAction::EnterId => {
            let id: String = Input::new()
                .with_prompt("Block id")
                .validate_with(|input: &String| -> Result<(), String> {
                    selection
                        .block(input.trim())
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()?;
            Ok(Some(id.trim().to_string()))
        }
        BlockAction::ListBlocks => {
            print!("{}", report::render_blocks(selection)?);
            Ok(None)
        }
    }
}

fn blocks_with_land_use<'s, 'a>(
    selection: &'s DistrictSelection<'a>,
    land_use: &LandUse,
) -> Vec<&'s EnrichedBlock<'a>> {
    selection
        .blocks()
        .iter()
        .filter(|b| b.land_use == *land_use)
        .collect()
}

/// Runs the analysis, reporting a failure instead of ending the wizard.
fn try_analyze<'a>(
    selection: &'a DistrictSelection<'a>,
    block_id: &str,
    config: &AnalysisConfig,
) -> Option<BlockAnalysis<'a>> {
    BlockAnalysis::run(selection, block_id, config)
        .inspect_err(|e| {
            log::error!("Failed to analyze block {block_id}: {e}");
            println!("{e}");
        })
        .ok()
}

fn print_analysis(analysis: &BlockAnalysis<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = OutputFormat::ALL.iter().map(OutputFormat::label).collect();
    let idx = Select::new()
        .with_prompt("Output")
        .items(&labels)
        .default(0)
        .interact()?;

    match OutputFormat::ALL[idx] {
        OutputFormat::Text => print!("{}", report::render_analysis(analysis)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(analysis)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use avm_spatial_models::{Crs, Layer};
    use avm_valuation_models::{Area, Block, District};
    use geo::{MultiPolygon, polygon};

    fn datasets(blocks: Layer<Block>) -> Datasets {
        let district = District {
            code: 13,
            name: "Teusaquillo".to_string(),
            crime_count: 3120,
            risk_level: "Medio".to_string(),
            geometry: MultiPolygon(vec![polygon![
                (x: -74.1, y: 4.6),
                (x: -74.0, y: 4.6),
                (x: -74.0, y: 4.7),
                (x: -74.1, y: 4.6),
            ]]),
        };
        Datasets {
            districts: Layer::new(Crs::Wgs84, vec![district]),
            areas: Layer::new(Crs::Wgs84, Vec::<Area>::new()),
            blocks,
            transit: Layer::new(Crs::Wgs84, vec![]),
            schools: Layer::new(Crs::Wgs84, vec![]),
        }
    }

    fn block() -> Block {
        Block {
            id: "M1".to_string(),
            district_code: 13,
            area_id: None,
            geometry: polygon![
                (x: -74.08, y: 4.61),
                (x: -74.0795, y: 4.61),
                (x: -74.0795, y: 4.6105),
                (x: -74.08, y: 4.6105),
                (x: -74.08, y: 4.61),
            ],
            value_m2: Some(4_500_000.0),
            projected_values: [None; 4],
            stratum: None,
            profitability: None,
            transit_group: None,
            school_group: None,
            nearby_schools: None,
            nearby_stations: None,
        }
    }

    #[test]
    fn failed_analysis_does_not_end_wizard() {
        let datasets = datasets(Layer::unreferenced(vec![block()]));
        let selection = DistrictSelection::by_code(&datasets, 13).unwrap();
        assert!(try_analyze(&selection, "M1", &AnalysisConfig::default()).is_none());
    }

    #[test]
    fn successful_analysis_is_returned() {
        let datasets = datasets(Layer::new(Crs::Wgs84, vec![block()]));
        let selection = DistrictSelection::by_code(&datasets, 13).unwrap();
        let analysis = try_analyze(&selection, "M1", &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.fact_sheet.block_id, "M1");
    }
}
