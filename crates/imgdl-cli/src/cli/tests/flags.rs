//! Tests for option defaults and flags.

use super::parse;
use crate::cli::Cli;
use clap::Parser;
use imgdl_core::scheduler::OutputMode;
use std::path::PathBuf;

#[test]
fn cli_defaults() {
    let cli = parse(&["imgdl", "--query", "dog"]);
    assert_eq!(cli.num_images, 100);
    assert!(cli.output_dir.is_none());
    assert!(cli.folder_name.is_none());
    assert!(!cli.urls_to_csv);
    assert!(!cli.just_csv_no_download);
    assert_eq!(cli.output_mode(), OutputMode::Download);
}

#[test]
fn cli_parse_num_images_and_dirs() {
    let cli = parse(&[
        "imgdl", "-q", "dog", "-n", "20", "-o", "/tmp/out", "-f", "pets",
    ]);
    assert_eq!(cli.num_images, 20);
    assert_eq!(cli.output_dir, Some(PathBuf::from("/tmp/out")));
    assert_eq!(cli.folder_name.as_deref(), Some("pets"));
}

#[test]
fn cli_parse_long_underscore_names() {
    let cli = parse(&[
        "imgdl",
        "--query",
        "dog",
        "--num_images",
        "5",
        "--output_dir",
        "/data",
        "--folder_name",
        "x",
        "--urls_to_csv",
    ]);
    assert_eq!(cli.num_images, 5);
    assert_eq!(cli.output_mode(), OutputMode::DownloadAndCsv);
}

#[test]
fn cli_parse_csv_only() {
    let cli = parse(&["imgdl", "-q", "dog", "--just_csv_no_download"]);
    assert_eq!(cli.output_mode(), OutputMode::CsvOnly);
    let both = parse(&["imgdl", "-q", "dog", "-s", "-j"]);
    assert_eq!(both.output_mode(), OutputMode::CsvOnly);
}

#[test]
fn cli_rejects_non_numeric_num_images() {
    assert!(Cli::try_parse_from(["imgdl", "-q", "dog", "-n", "many"]).is_err());
}
