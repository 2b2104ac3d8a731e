//! Dataset loading events.
//!
//! The loader announces each dataset before reading it and reports how
//! many records survived parsing. Rendering is left to the caller (an
//! `indicatif` bar in the CLI, nothing in tests).

use std::path::Path;
use std::sync::Arc;

use crate::DatasetKind;

/// Receives dataset loading events, in load order.
pub trait LoadProgress: Send + Sync {
    /// Called once before anything is read.
    fn start(&self, datasets: usize);

    /// `kind` is about to be read from `path`.
    fn reading(&self, kind: DatasetKind, path: &Path);

    /// `kind` was parsed and `records` usable records were kept.
    fn loaded(&self, kind: DatasetKind, records: usize);

    /// Every dataset was loaded.
    fn finish(&self, summary: &str);
}

/// A [`LoadProgress`] that ignores every event.
pub struct NullProgress;

impl LoadProgress for NullProgress {
    fn start(&self, _datasets: usize) {}
    fn reading(&self, _kind: DatasetKind, _path: &Path) {}
    fn loaded(&self, _kind: DatasetKind, _records: usize) {}
    fn finish(&self, _summary: &str) {}
}

#[must_use]
pub fn null_progress() -> Arc<dyn LoadProgress> {
    Arc::new(NullProgress)
}
