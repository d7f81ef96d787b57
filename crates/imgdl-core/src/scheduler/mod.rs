//! Two-tier fetch scheduler.
//!
//! The multi-query orchestrator runs up to `query_workers` queries at once;
//! each query's batch coordinator runs up to `fetch_workers` fetches at once.
//! A shared [`FetchBudget`] caps fetches in flight across the whole run at
//! `max_in_flight`, so the product of both widths is never the effective limit.
//!
//! Pipeline per query: extractor → record cap → fan-out (placement → storage
//! → fetcher) → optional CSV listing.

mod batch;
mod budget;
mod orchestrate;
mod pool;

pub use batch::DownloadTask;
pub use budget::{BudgetPermit, FetchBudget};
pub use pool::{run_bounded, TaskPanicked};

use std::sync::Arc;

use crate::config::ImgdlConfig;
use crate::extract::{Extractor, ImageRecord};
use crate::fetch::Fetcher;
use crate::placement::Placement;

/// What a batch does with its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Fetch every record.
    #[default]
    Download,
    /// Fetch every record and write the URL listing.
    DownloadAndCsv,
    /// Write the URL listing only; no fetch tasks are created.
    CsvOnly,
}

impl OutputMode {
    /// Maps the `--urls_to_csv` / `--just_csv_no_download` flags; the latter wins.
    pub fn from_flags(urls_to_csv: bool, just_csv_no_download: bool) -> Self {
        match (urls_to_csv, just_csv_no_download) {
            (_, true) => OutputMode::CsvOnly,
            (true, false) => OutputMode::DownloadAndCsv,
            (false, false) => OutputMode::Download,
        }
    }

    pub fn fetches(self) -> bool {
        self != OutputMode::CsvOnly
    }

    pub fn writes_csv(self) -> bool {
        self != OutputMode::Download
    }
}

/// Concurrency widths and the per-query record cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub query_workers: usize,
    pub fetch_workers: usize,
    pub max_in_flight: usize,
    /// Keep only the first N records of each query (`None` = all).
    pub max_images: Option<usize>,
}

impl Default for Limits {
    fn default() -> Self {
        Self::from_config(&ImgdlConfig::default(), None)
    }
}

impl Limits {
    pub fn from_config(cfg: &ImgdlConfig, max_images: Option<usize>) -> Self {
        let (query_workers, fetch_workers, max_in_flight) = cfg.widths();
        Self {
            query_workers,
            fetch_workers,
            max_in_flight,
            max_images,
        }
    }

    fn cap(&self, mut records: Vec<ImageRecord>) -> Vec<ImageRecord> {
        if let Some(max) = self.max_images {
            records.truncate(max);
        }
        records
    }
}

/// Everything a run needs: collaborators, placement, widths, and the shared budget.
pub struct Pipeline {
    extractor: Arc<dyn Extractor>,
    fetcher: Arc<dyn Fetcher>,
    placement: Placement,
    limits: Limits,
    budget: FetchBudget,
}

impl Pipeline {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        fetcher: Arc<dyn Fetcher>,
        placement: Placement,
        limits: Limits,
    ) -> Self {
        let budget = FetchBudget::new(limits.max_in_flight);
        Self {
            extractor,
            fetcher,
            placement,
            limits,
            budget,
        }
    }
}
