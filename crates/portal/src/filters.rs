//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// A rating count with its noun: `1 rating`, `0 ratings`.
///
/// Usage in templates: `{{ store.total_ratings|rating_count }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn rating_count(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    let noun = if count == "1" { "rating" } else { "ratings" };
    Ok(format!("{count} {noun}"))
}
