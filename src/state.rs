use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::color::ColorMap;
use crate::data::aggregate::{summarize, AggregateSummary};
use crate::data::error::LoadResult;
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::load_dataset;
use crate::data::model::EvDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<EvDataset>,

    /// Statistics for `dataset`, recomputed whenever it is replaced.
    pub summary: Option<AggregateSummary>,

    /// Search text and selectors for the table.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Colours for the EV-type slices.
    pub type_colors: ColorMap,

    /// File the current (or pending) dataset comes from.
    pub source: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    pending: Option<Receiver<LoadResult<EvDataset>>>,
}

impl AppState {
    /// Start loading `path` on a background thread.
    ///
    /// `notify` runs on that thread once the result is ready, typically to
    /// request a repaint. A load already in flight is left to finish but its
    /// result is discarded.
    pub fn begin_load(&mut self, path: PathBuf, notify: impl FnOnce() + Send + 'static) {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let result = load_dataset(&worker_path);
            // The receiver is gone if another load superseded this one.
            let _ = tx.send(result);
            notify();
        });

        log::info!("Loading {}", path.display());
        self.source = Some(path);
        self.pending = Some(rx);
        self.loading = true;
        self.status_message = None;
    }

    /// Pick up a finished background load. Returns `true` if state changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(result) => result.map_err(|e| format!("{e}")),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err("loader thread exited unexpectedly".to_string()),
        };
        self.pending = None;

        match outcome {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records from {}",
                    dataset.len(),
                    self.source_label()
                );
                self.set_dataset(dataset);
            }
            Err(msg) => {
                log::error!("Failed to load {}: {msg}", self.source_label());
                self.status_message = Some(format!("Error: {msg}"));
                self.loading = false;
            }
        }
        true
    }

    /// Ingest a newly loaded dataset, recompute the summary and reset filters.
    pub fn set_dataset(&mut self, dataset: EvDataset) {
        let summary = summarize(&dataset.records);
        self.type_colors = ColorMap::new(
            summary
                .type_distribution
                .iter()
                .map(|t| t.ev_type.as_str()),
        );
        if dataset.is_empty() {
            log::warn!("Dataset {} contains no records", self.source_label());
        }

        self.filters = FilterState::default();
        self.visible_indices = (0..dataset.len()).collect();
        self.summary = Some(summary);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filters);
        }
    }

    pub fn set_search_text(&mut self, text: String) {
        if self.filters.search_text != text {
            self.filters.search_text = text;
            self.refilter();
        }
    }

    /// Select a state; `None` shows all states.
    pub fn set_state_filter(&mut self, state: Option<String>) {
        if self.filters.state != state {
            self.filters.state = state;
            self.refilter();
        }
    }

    /// Select a make; `None` shows all makes.
    pub fn set_make_filter(&mut self, make: Option<String>) {
        if self.filters.make != make {
            self.filters.make = make;
            self.refilter();
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string())
    }
}
