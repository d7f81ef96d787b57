//! Per-task, per-query, and per-run results.
//!
//! Failures are values here: the coordinator aggregates them instead of
//! aborting on the first error.

use std::fmt;
use std::path::PathBuf;

use crate::extract::ImageRecord;
use crate::query::Query;

/// Tag for why a task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ConnectTimeout,
    ReadTimeout,
    Http(u32),
    Connection,
    /// Destination folder or file could not be created/written.
    Persist,
    /// The task panicked; isolated to this record.
    Panicked,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::ConnectTimeout => f.write_str("connect timeout"),
            FailureKind::ReadTimeout => f.write_str("read timeout"),
            FailureKind::Http(code) => write!(f, "HTTP {}", code),
            FailureKind::Connection => f.write_str("connection error"),
            FailureKind::Persist => f.write_str("write error"),
            FailureKind::Panicked => f.write_str("panicked"),
            FailureKind::Other => f.write_str("error"),
        }
    }
}

/// Result of one download task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Saved {
        index: usize,
        path: PathBuf,
        bytes: u64,
    },
    Failed {
        index: usize,
        url: String,
        kind: FailureKind,
        message: String,
    },
}

impl TaskOutcome {
    pub fn index(&self) -> usize {
        match self {
            TaskOutcome::Saved { index, .. } | TaskOutcome::Failed { index, .. } => *index,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, TaskOutcome::Saved { .. })
    }
}

/// Everything that happened for one query's records.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub query: Query,
    /// Records the batch was built from (after any `max_images` cap).
    pub records: Vec<ImageRecord>,
    /// One entry per fetch task, sorted by index. Empty in CSV-only mode.
    pub outcomes: Vec<TaskOutcome>,
    /// Where the URL listing was written, when requested and successful.
    pub csv_path: Option<PathBuf>,
}

impl BatchReport {
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.saved()
    }
}

/// Result of one query: either its batch ran, or extraction failed before fan-out.
#[derive(Debug, Clone)]
pub enum QueryReport {
    Completed(BatchReport),
    ExtractionFailed { query: Query, message: String },
}

impl QueryReport {
    pub fn query(&self) -> &Query {
        match self {
            QueryReport::Completed(batch) => &batch.query,
            QueryReport::ExtractionFailed { query, .. } => query,
        }
    }
}

/// Aggregate of a multi-query run, in submission order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub queries: Vec<QueryReport>,
}

impl RunReport {
    pub fn saved(&self) -> usize {
        self.batches().map(BatchReport::saved).sum()
    }

    pub fn failed(&self) -> usize {
        self.batches().map(BatchReport::failed).sum()
    }

    pub fn extraction_failures(&self) -> usize {
        self.queries
            .iter()
            .filter(|q| matches!(q, QueryReport::ExtractionFailed { .. }))
            .count()
    }

    pub fn batches(&self) -> impl Iterator<Item = &BatchReport> {
        self.queries.iter().filter_map(|q| match q {
            QueryReport::Completed(batch) => Some(batch),
            QueryReport::ExtractionFailed { .. } => None,
        })
    }
}
