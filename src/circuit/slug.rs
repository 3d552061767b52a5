//! # Slug Derivation
//!
//! Turns a display name into a URL-safe identifier.

use std::sync::OnceLock;

use regex::Regex;

fn separator_runs() -> &'static Regex {
    static RUNS: OnceLock<Regex> = OnceLock::new();
    RUNS.get_or_init(|| Regex::new("[^a-z0-9]+").expect("static slug pattern is valid"))
}

/// Derive a slug from a display name.
///
/// The name is lowercased, every run of characters outside `[a-z0-9]` collapses
/// to a single hyphen, and one leading and one trailing hyphen are stripped.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let collapsed = separator_runs().replace_all(&lowered, "-");

    let trimmed = collapsed.strip_prefix('-').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    trimmed.to_string()
}
