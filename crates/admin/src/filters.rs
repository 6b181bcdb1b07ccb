//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Turn a backend constant into a readable label.
///
/// Usage in templates: `{{ row.key|humanize }}` renders `HOME_CLEANING` as
/// `Home cleaning`.
#[askama::filter_fn]
pub fn humanize(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(humanize_label(&value.to_string()))
}

fn humanize_label(raw: &str) -> String {
    let spaced = raw
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
