//! Number formatting and percentage helpers shared by every renderer

use crate::error::{Error, Result};

/// Format a count with a compact suffix: `1M`, `221K`, `88.9K`, `999`.
///
/// Millions carry no decimals. Thousands carry one decimal below 100K and
/// none from there on, with a trailing `.0` dropped. Values that round up to
/// the next unit are promoted (`999_999` is `1M`, not `1000K`). Rounding is
/// half-up on the integer value so results never depend on float ties.
pub fn format_compact(n: u64) -> String {
    if n >= 1_000_000 {
        return format!("{}M", div_round(n, 1_000_000));
    }

    if n >= 1_000 {
        let tenths = div_round(n, 100);
        if tenths < 1_000 {
            return if tenths % 10 == 0 {
                format!("{}K", tenths / 10)
            } else {
                format!("{}.{}K", tenths / 10, tenths % 10)
            };
        }

        let whole = div_round(n, 1_000);
        if whole >= 1_000 {
            return format!("{}M", div_round(n, 1_000_000));
        }
        return format!("{whole}K");
    }

    format_grouped(n)
}

fn div_round(n: u64, d: u64) -> u64 {
    n / d + u64::from(n % d >= d / 2)
}

/// Format an integer with comma thousands separators (`220,931`)
pub fn format_grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `value / total * 100` as a float
pub fn percent(value: f64, total: f64) -> Result<f64> {
    if total == 0.0 {
        return Err(Error::DivisionByZero);
    }
    Ok(value / total * 100.0)
}

/// `value / total * 100` rendered with exactly one decimal (`"92.6"`)
pub fn percent_of_total(value: u64, total: u64) -> Result<String> {
    let pct = percent(value as f64, total as f64)?;
    Ok(format!("{pct:.1}"))
}

/// Americas share of a total, same formatting as [`percent_of_total`]
pub fn americas_share_percent(americas_count: u64, total_count: u64) -> Result<String> {
    percent_of_total(americas_count, total_count)
}
