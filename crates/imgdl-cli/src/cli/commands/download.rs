//! Download run: validate placement, build the pipeline, run every query, print a summary.

use anyhow::{Context, Result};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::extract::SearchPageExtractor;
use imgdl_core::fetch::CurlFetcher;
use imgdl_core::outcome::{QueryReport, RunReport};
use imgdl_core::placement::{DownloadsDir, Placement};
use imgdl_core::query::Query;
use imgdl_core::scheduler::{Limits, OutputMode, Pipeline};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything the download command needs from the command line.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub queries: Vec<Query>,
    pub output_dir: Option<PathBuf>,
    pub folder_name: Option<String>,
    pub max_images: usize,
    pub mode: OutputMode,
}

pub async fn run_download(cfg: &ImgdlConfig, request: DownloadRequest) -> Result<()> {
    // Invalid destination is fatal before anything is dispatched.
    let placement = Placement::new(
        request.output_dir.as_deref(),
        request.folder_name.clone(),
        &DownloadsDir,
    )?;
    tracing::info!("saving under {}", placement.base_dir().display());

    let http = cfg.http_settings();
    let pipeline = Pipeline::new(
        Arc::new(SearchPageExtractor::new(cfg.search_url.clone(), http.clone())),
        Arc::new(CurlFetcher::new(http)),
        placement,
        Limits::from_config(cfg, Some(request.max_images)),
    );

    let queries = request.queries;
    let mode = request.mode;
    let report = tokio::task::spawn_blocking(move || pipeline.run_all(queries, mode))
        .await
        .context("download task join")?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    for query in &report.queries {
        match query {
            QueryReport::Completed(batch) => {
                if batch.outcomes.is_empty() {
                    println!("{}: {} URL(s) found", batch.query, batch.records.len());
                } else {
                    println!(
                        "{}: {} saved, {} failed ({} found)",
                        batch.query,
                        batch.saved(),
                        batch.failed(),
                        batch.records.len()
                    );
                }
                if let Some(csv) = &batch.csv_path {
                    println!("  URL list: {}", csv.display());
                }
            }
            QueryReport::ExtractionFailed { query, message } => {
                println!("{}: search failed: {}", query, message);
            }
        }
    }
    if report.queries.len() > 1 {
        println!(
            "Total: {} saved, {} failed, {} search failure(s)",
            report.saved(),
            report.failed(),
            report.extraction_failures()
        );
    }
}
