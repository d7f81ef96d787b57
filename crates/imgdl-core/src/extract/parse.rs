//! Search results page scanning.
//!
//! Each candidate image is described by a JSON object inside a
//! `<div class="rg_meta notranslate">` container: `ou` is the image URL and
//! `ity` the file-type hint. This follows the page's current markup and will
//! stop matching when the markup changes.

use html_escape::decode_html_entities;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

use super::ImageRecord;

/// JSON payload of one `rg_meta` container.
#[derive(Debug, Deserialize)]
struct RgMeta {
    ou: String,
    #[serde(default)]
    ity: String,
}

fn meta_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)<div\b[^>]*\bclass\s*=\s*["']rg_meta notranslate["'][^>]*>(.*?)</div>"#)
            .expect("rg_meta pattern is valid")
    })
}

/// Extracts records in page order. Containers whose JSON does not parse are
/// skipped with a warning; the rest of the page is still used.
pub fn parse_records(html: &str) -> Vec<ImageRecord> {
    meta_pattern()
        .captures_iter(html)
        .filter_map(|caps| {
            let text = unescape_html(caps.get(1)?.as_str().trim());
            match serde_json::from_str::<RgMeta>(&text) {
                Ok(meta) => Some(ImageRecord {
                    location: meta.ou,
                    type_hint: meta.ity,
                }),
                Err(e) => {
                    tracing::warn!("skipping malformed rg_meta block: {}", e);
                    None
                }
            }
        })
        .collect()
}

fn unescape_html(s: &str) -> String {
    decode_html_entities(s).into_owned()
}
