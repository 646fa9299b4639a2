//! Text formatting for metric values, table cells and metadata dates.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Cell, DateRange, Metric, MetricFormat};

pub const NOT_AVAILABLE: &str = "N/A";

/// Insert `,` every three digits of a plain decimal string such as `-1234.5`.
fn group_digits(plain: &str) -> String {
    let (sign, rest) = match plain.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", plain),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `-0` after rounding prints as `0`.
fn unsigned_zero(plain: &str) -> &str {
    match plain.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest,
        _ => plain,
    }
}

/// Integral values print without decimals, others with at most two.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if n.fract() == 0.0 {
        return group_digits(unsigned_zero(&format!("{n:.0}")));
    }
    let fixed = format!("{n:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    group_digits(unsigned_zero(trimmed))
}

pub fn format_integer(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    group_digits(unsigned_zero(&format!("{:.0}", n.round())))
}

pub fn format_currency(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let digits = group_digits(&format!("{:.2}", n.abs()));
    if n < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

pub fn format_percent(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{n:.2}%")
}

pub fn format_metric(metric: &Metric) -> String {
    match metric.value {
        Cell::Text(ref s) => s.clone(),
        Cell::Number(n) => match metric.format {
            MetricFormat::Number => format_number(n),
            MetricFormat::Integer => format_integer(n),
            MetricFormat::Currency => format_currency(n),
            MetricFormat::Percent => format_percent(n),
        },
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// US-style short date, e.g. `3/7/2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// `None` when neither bound is set; a missing bound prints as `N/A`.
pub fn format_date_range(range: &DateRange) -> Option<String> {
    if range.start.is_none() && range.end.is_none() {
        return None;
    }
    let bound = |d: Option<NaiveDate>| d.map(format_date).unwrap_or_else(|| NOT_AVAILABLE.into());
    Some(format!("{} - {}", bound(range.start), bound(range.end)))
}

/// Filter values are JSON; strings print without quotes, arrays comma-joined.
pub fn format_filter_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => NOT_AVAILABLE.to_string(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(format_filter_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}
