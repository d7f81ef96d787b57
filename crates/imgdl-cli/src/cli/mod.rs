//! CLI for the imgdl bulk image downloader.

mod commands;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use imgdl_core::config;
use imgdl_core::query::{queries_from_groups, Query};
use imgdl_core::scheduler::OutputMode;
use std::path::PathBuf;

use commands::{run_download, DownloadRequest};

/// Top-level CLI for imgdl.
#[derive(Debug, Parser)]
#[command(name = "imgdl")]
#[command(about = "Downloads images in bulk from image search results", long_about = None)]
pub struct Cli {
    /// The search query (one or more words).
    #[arg(short = 'q', long = "query", num_args = 1.., value_name = "WORDS")]
    pub query: Option<Vec<String>>,

    /// Maximum number of images to download per query.
    #[arg(short = 'n', long = "num_images", default_value_t = 100, value_name = "N")]
    pub num_images: usize,

    /// A query to run alongside others; repeat for each query (e.g. -l dog -l red bear).
    #[arg(short = 'l', long = "list_queries", num_args = 1.., action = ArgAction::Append, value_name = "WORDS")]
    pub list_queries: Vec<Vec<String>>,

    /// Main directory for the image folders. Defaults to the Downloads directory.
    #[arg(short = 'o', long = "output_dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Folder (inside the output directory) holding the images. Defaults to the query.
    #[arg(short = 'f', long = "folder_name", value_name = "NAME")]
    pub folder_name: Option<String>,

    /// Also save the image URLs and their extensions to a CSV file.
    #[arg(short = 's', long = "urls_to_csv")]
    pub urls_to_csv: bool,

    /// Save the image URLs and extensions to a CSV file without downloading images.
    #[arg(short = 'j', long = "just_csv_no_download")]
    pub just_csv_no_download: bool,
}

impl Cli {
    /// Single query first, then each `--list_queries` group, in command-line order.
    pub fn queries(&self) -> Vec<Query> {
        let mut queries = Vec::new();
        if let Some(words) = &self.query {
            queries.extend(Query::from_tokens(words));
        }
        queries.extend(queries_from_groups(&self.list_queries));
        queries
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_flags(self.urls_to_csv, self.just_csv_no_download)
    }

    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init().context("load config")?;
        tracing::debug!("loaded config: {:?}", cfg);

        let queries = cli.queries();
        if queries.is_empty() {
            anyhow::bail!("no query given; use --query WORDS or --list_queries WORDS");
        }

        let request = DownloadRequest {
            queries,
            output_dir: cli.output_dir.clone(),
            folder_name: cli.folder_name.clone(),
            max_images: cli.num_images,
            mode: cli.output_mode(),
        };
        run_download(&cfg, request).await
    }
}

#[cfg(test)]
mod tests;
