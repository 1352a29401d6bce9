//! Dashboard widgets: top categories and a same-weekday spending forecast

use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::models::ExpenseRecord;
use crate::stats::CategoryTotals;

pub const NOT_ENOUGH_DATA_MESSAGE: &str = "Belum cukup data untuk prediksi hari ini.";

const WEEKDAY_NAMES: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub total: i64,
}

/// Expected spend for today, from past days on the same weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub amount: i64,
    pub weekday: String,
    /// Distinct past dates the average is taken over
    pub sample_days: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub top_categories: Vec<CategoryTotal>,
    pub forecast: Forecast,
}

/// Indonesian weekday name for a date
pub fn weekday_name(date: NaiveDateTime) -> &'static str {
    WEEKDAY_NAMES[date.weekday().num_days_from_monday() as usize]
}

/// Format an amount with thousands separators, e.g. `1,250,000`
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if amount < 0 {
        out.insert(0, '-');
    }
    out
}

/// Biggest categories first, ties in first-seen order
pub fn top_categories(records: &[ExpenseRecord], limit: usize) -> Vec<CategoryTotal> {
    let totals = CategoryTotals::from_records(records);
    let mut ranked: Vec<CategoryTotal> = totals
        .iter()
        .map(|(category, total)| CategoryTotal {
            name: category.as_str().to_string(),
            total: *total,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked.truncate(limit);
    ranked
}

/// Average daily spend on `now`'s weekday
///
/// Sums every record dated on that weekday and divides by the number of
/// distinct dates involved, not the number of records.
pub fn forecast(records: &[ExpenseRecord], now: NaiveDateTime) -> Forecast {
    let weekday = now.weekday();
    let mut total: i64 = 0;
    let mut dates = HashSet::new();

    for record in records {
        let Some(date) = record.date else { continue };
        if date.weekday() == weekday {
            total = total.saturating_add(record.amount_value());
            dates.insert(date.date());
        }
    }

    let amount = if dates.is_empty() {
        0
    } else {
        total / dates.len() as i64
    };
    let name = weekday_name(now);
    let message = if amount == 0 {
        NOT_ENOUGH_DATA_MESSAGE.to_string()
    } else {
        format!(
            "Rata-rata pengeluaranmu di hari {} adalah Rp {}.",
            name,
            format_rupiah(amount)
        )
    };

    Forecast {
        amount,
        weekday: name.to_string(),
        sample_days: dates.len(),
        message,
    }
}

/// Dashboard aggregates over the most recent records
///
/// `records` is expected newest first; only the configured window is used.
pub fn dashboard(records: &[ExpenseRecord], now: NaiveDateTime, config: &DashboardConfig) -> DashboardStats {
    let window = &records[..records.len().min(config.recent_window)];
    DashboardStats {
        top_categories: top_categories(window, config.top_categories),
        forecast: forecast(window, now),
    }
}
