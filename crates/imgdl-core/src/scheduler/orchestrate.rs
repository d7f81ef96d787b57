//! Multi-query orchestrator: one batch per query, queries run in a bounded pool.

use std::time::Instant;

use crate::outcome::{QueryReport, RunReport};
use crate::query::Query;

use super::pool::run_bounded;
use super::{OutputMode, Pipeline};

impl Pipeline {
    /// Extracts records for `query` and runs its batch. Extraction failure is
    /// reported on the query and yields no fetches.
    pub fn run_query(&self, query: &Query, mode: OutputMode) -> QueryReport {
        match self.extractor.extract(query) {
            Ok(records) => QueryReport::Completed(self.run_batch(query, records, mode)),
            Err(e) => {
                tracing::warn!(query = %query, "record extraction failed: {}", e);
                QueryReport::ExtractionFailed {
                    query: query.clone(),
                    message: e.to_string(),
                }
            }
        }
    }

    /// Runs every query with at most `query_workers` in progress. One query's
    /// failure never affects its siblings. Reports are in submission order.
    pub fn run_all(&self, queries: Vec<Query>, mode: OutputMode) -> RunReport {
        let started = Instant::now();
        tracing::info!(
            queries = queries.len(),
            query_workers = self.limits.query_workers,
            fetch_workers = self.limits.fetch_workers,
            max_in_flight = self.budget.max_total(),
            ?mode,
            "starting run"
        );

        let submitted = queries.clone();
        let reports = run_bounded(queries, self.limits.query_workers, |_, query| {
            self.run_query(&query, mode)
        })
        .into_iter()
        .map(|(index, res)| {
            res.unwrap_or_else(|panicked| {
                tracing::warn!(query = %submitted[index], "{}", panicked);
                QueryReport::ExtractionFailed {
                    query: submitted[index].clone(),
                    message: panicked.to_string(),
                }
            })
        })
        .collect();

        let report = RunReport { queries: reports };
        tracing::info!(
            saved = report.saved(),
            failed = report.failed(),
            extraction_failures = report.extraction_failures(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run finished"
        );
        report
    }
}
