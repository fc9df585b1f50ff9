//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a rupee amount with Indian digit grouping.
///
/// Accepts a `Price` (already prefixed with `₹`) or a bare number.
///
/// Usage in templates: `{{ item.price|inr }}` renders `₹1,25,000`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn inr(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_inr(&value.to_string()))
}

/// Returns the CSS `display` value for a count badge: hidden at zero.
///
/// Usage in templates: `style="display: {{ count|badge_display }}"`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn badge_display(
    count: impl Display,
    _env: &dyn askama::Values,
) -> askama::Result<&'static str> {
    Ok(if count.to_string() == "0" { "none" } else { "flex" })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Indian-grouped rupee amount: `1500` or `₹1500` becomes `₹1,500`.
///
/// Input that isn't a number is returned trimmed but otherwise unchanged.
#[must_use]
pub fn format_inr(raw: &str) -> String {
    let amount = raw.trim().trim_start_matches('₹');
    let (sign, amount) = amount
        .strip_prefix('-')
        .map_or(("", amount), |rest| ("-", rest));
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return raw.trim().to_owned();
    }

    let grouped = group_indian(whole);
    if fraction.is_empty() {
        format!("{sign}₹{grouped}")
    } else {
        format!("{sign}₹{grouped}.{fraction}")
    }
}

/// Groups the last three digits, then every two: `12500000` -> `1,25,00,000`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
