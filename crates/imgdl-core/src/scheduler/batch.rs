//! Batch coordinator: fan out one query's records to the fetch pool.

use std::time::Instant;

use crate::csv_sink;
use crate::extract::ImageRecord;
use crate::outcome::{BatchReport, FailureKind, TaskOutcome};
use crate::query::Query;
use crate::storage::ImageWriter;

use super::pool::run_bounded;
use super::{OutputMode, Pipeline};

/// One record scheduled for download. Consumed by exactly one fetch attempt.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub index: usize,
    pub record: ImageRecord,
}

fn failed(task: &DownloadTask, kind: FailureKind, message: String) -> TaskOutcome {
    TaskOutcome::Failed {
        index: task.index,
        url: task.record.location.clone(),
        kind,
        message,
    }
}

impl Pipeline {
    /// Runs every record of `query` through the fetch pool and waits for all of them.
    /// Failures are collected per task; none of them stop the batch.
    pub fn run_batch(&self, query: &Query, records: Vec<ImageRecord>, mode: OutputMode) -> BatchReport {
        let records = self.limits.cap(records);
        let started = Instant::now();

        let outcomes = if mode.fetches() {
            let tasks: Vec<DownloadTask> = records
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, record)| DownloadTask { index, record })
                .collect();
            run_bounded(tasks, self.limits.fetch_workers, |_, task| {
                self.fetch_one(query, task)
            })
            .into_iter()
            .map(|(index, res)| {
                res.unwrap_or_else(|panicked| {
                    tracing::warn!(query = %query, index, "{}", panicked);
                    TaskOutcome::Failed {
                        index,
                        url: records[index].location.clone(),
                        kind: FailureKind::Panicked,
                        message: panicked.to_string(),
                    }
                })
            })
            .collect()
        } else {
            Vec::new()
        };

        let csv_path = if mode.writes_csv() {
            match csv_sink::write_urls_csv(&records, self.placement.base_dir(), &query.slug()) {
                Ok(path) => {
                    tracing::info!(query = %query, path = %path.display(), "wrote URL listing");
                    Some(path)
                }
                Err(e) => {
                    tracing::warn!(query = %query, "failed to write URL listing: {:#}", e);
                    None
                }
            }
        } else {
            None
        };

        let report = BatchReport {
            query: query.clone(),
            records,
            outcomes,
            csv_path,
        };
        tracing::info!(
            query = %query,
            records = report.records.len(),
            saved = report.saved(),
            failed = report.failed(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );
        report
    }

    /// Resolve → create temp file → fetch under a budget permit → rename.
    fn fetch_one(&self, query: &Query, task: DownloadTask) -> TaskOutcome {
        let path = match self.placement.resolve(query, task.index, &task.record.type_hint) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(query = %query, index = task.index, "cannot create folder: {}", e);
                return failed(&task, FailureKind::Persist, e.to_string());
            }
        };
        let mut writer = match ImageWriter::create(&path) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot create file: {}", e);
                return failed(&task, FailureKind::Persist, e.to_string());
            }
        };

        let result = {
            let _permit = self.budget.acquire();
            self.fetcher.fetch(&task.record.location, &mut writer)
        };

        match result {
            Ok(_) => match writer.finalize() {
                Ok(bytes) => {
                    tracing::debug!(path = %path.display(), bytes, "saved image");
                    TaskOutcome::Saved {
                        index: task.index,
                        path,
                        bytes,
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "failed to save image: {:#}", e);
                    failed(&task, FailureKind::Persist, format!("{:#}", e))
                }
            },
            Err(e) => {
                writer.discard();
                tracing::warn!(
                    query = %query,
                    index = task.index,
                    url = %task.record.location,
                    kind = %e.kind(),
                    "image fetch failed, continuing: {}",
                    e
                );
                failed(&task, e.kind(), e.to_string())
            }
        }
    }
}
