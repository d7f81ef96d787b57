//! Search query normalization and derived names.
//!
//! A query arrives as a list of command-line tokens. It is joined into one
//! search string, and a filesystem-friendly slug (folder name, CSV base name)
//! is derived from it. Two queries with the same slug share a folder; that is
//! accepted, not corrected.

use std::fmt;

/// Characters stripped from the edges of tokens and slugs (list/quote punctuation).
const STRAY_PUNCTUATION: &[char] = &['[', ']', '\'', '"', ','];

/// A normalized search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    text: String,
}

impl Query {
    /// Normalizes a raw query string (see [`Query::from_tokens`]).
    /// Returns `None` if nothing remains after normalization.
    pub fn new(raw: &str) -> Option<Self> {
        Self::from_tokens(raw.split_whitespace())
    }

    /// Joins tokens with single spaces after stripping list/quote punctuation
    /// from each token's edges. Tokens that are pure punctuation are dropped.
    ///
    /// `["red", "bear"]` → `"red bear"`; `["['dog',"]` → `"dog"`.
    pub fn from_tokens<I, S>(tokens: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = tokens
            .into_iter()
            .flat_map(|t| {
                t.as_ref()
                    .split_whitespace()
                    .map(|w| w.trim_matches(STRAY_PUNCTUATION).to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return None;
        }
        Some(Query {
            text: words.join(" "),
        })
    }

    /// The search string sent to the extractor.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Folder and CSV base name: `+` and runs of whitespace become a single `_`.
    ///
    /// `"red   bear"` → `"red_bear"`, `"cat+dog"` → `"cat_dog"`.
    pub fn slug(&self) -> String {
        slugify(&self.text)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Placeholder slug for text made only of separators (e.g. `+`).
pub const EMPTY_SLUG: &str = "_";

/// Slug for any raw string, as used for default folder names.
/// Never empty, so images never land directly in the base directory.
pub fn slugify(raw: &str) -> String {
    let slug = raw
        .trim_matches(STRAY_PUNCTUATION)
        .split(|c: char| c == '+' || c.is_whitespace())
        .map(|part| part.trim_matches(STRAY_PUNCTUATION))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Turns repeated `--list_queries` groups into independent queries, dropping empty groups.
pub fn queries_from_groups<G, S>(groups: &[G]) -> Vec<Query>
where
    G: AsRef<[S]>,
    S: AsRef<str>,
{
    groups
        .iter()
        .filter_map(|g| Query::from_tokens(g.as_ref().iter().map(|s| s.as_ref())))
        .collect()
}
