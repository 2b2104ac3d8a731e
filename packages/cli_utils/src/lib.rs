#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal helpers for the `avm` binary.
//!
//! [`DatasetProgress`] shows which dataset is loading and how many records
//! each one kept, and [`init_logger`] routes `log` output through
//! `indicatif-log-bridge` so log lines do not tear the bar.

use std::path::Path;
use std::sync::{Arc, Mutex};

use avm_ingest::DatasetKind;
use avm_ingest::progress::LoadProgress;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Dataset loading bar: one tick per dataset, with the record counts of
/// the datasets loaded so far as its message.
pub struct DatasetProgress {
    bar: ProgressBar,
    loaded: Mutex<Vec<(DatasetKind, usize)>>,
}

impl DatasetProgress {
    /// Adds the bar to `multi`. Its length is set when loading starts.
    #[must_use]
    pub fn attach(multi: &MultiProgress) -> Arc<dyn LoadProgress> {
        let bar = multi.add(ProgressBar::new(0));
        bar.set_style(
            ProgressStyle::with_template("{prefix:>9.cyan} [{bar:20.green/dim}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        Arc::new(Self {
            bar,
            loaded: Mutex::new(Vec::new()),
        })
    }
}

/// `districts 20, areas 1.2k, blocks 43.1k`
fn loaded_message(loaded: &[(DatasetKind, usize)]) -> String {
    loaded
        .iter()
        .map(|(kind, records)| format!("{kind} {}", short_count(*records)))
        .collect::<Vec<_>>()
        .join(", ")
}

#[allow(clippy::cast_precision_loss)]
fn short_count(records: usize) -> String {
    if records < 1000 {
        records.to_string()
    } else {
        format!("{:.1}k", records as f64 / 1000.0)
    }
}

impl LoadProgress for DatasetProgress {
    fn start(&self, datasets: usize) {
        self.bar.set_length(u64::try_from(datasets).unwrap_or(u64::MAX));
        self.bar.set_position(0);
    }

    fn reading(&self, kind: DatasetKind, path: &Path) {
        self.bar.set_prefix(kind.to_string());
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
    }

    fn loaded(&self, kind: DatasetKind, records: usize) {
        self.bar.inc(1);
        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.push((kind, records));
            self.bar.set_message(loaded_message(&loaded));
        }
    }

    fn finish(&self, summary: &str) {
        self.bar.set_prefix("done");
        self.bar.finish_with_message(summary.to_string());
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Fails only if a logger is already installed.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}
