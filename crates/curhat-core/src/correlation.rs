//! Emotion-to-spending correlation
//!
//! Flags the emotion whose average purchase is materially above the overall
//! average purchase. This is a threshold heuristic, not a significance test.

use serde::{Deserialize, Serialize};

use crate::config::CorrelationConfig;
use crate::emotions::emotion_totals;
use crate::models::{Emotion, ExpenseRecord};

/// An emotion that drives above-average spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFinding {
    pub emotion: Emotion,
    /// How far the emotion's average spend sits above the global average, in percent
    pub deviation_percent: f64,
    pub emotion_average: f64,
    pub global_average: f64,
    pub count: i64,
}

/// Detect the most over-spending emotion, if any clears the threshold
///
/// Returns `None` for small samples, a zero global average, or when no
/// emotion with enough observations exceeds the materiality threshold.
/// Ties go to the emotion that appears first in `records`.
pub fn detect(records: &[ExpenseRecord], config: &CorrelationConfig) -> Option<CorrelationFinding> {
    if records.len() < config.min_records {
        tracing::debug!(
            records = records.len(),
            min = config.min_records,
            "Not enough records for correlation"
        );
        return None;
    }

    let totals = emotion_totals(records);
    let global_total = totals.iter().fold(0i64, |acc, (_, t, _)| acc.saturating_add(*t));
    let global_count: i64 = totals.iter().map(|(_, _, c)| c).sum();
    if global_count == 0 {
        return None;
    }
    let global_average = global_total as f64 / global_count as f64;
    if global_average <= 0.0 {
        return None;
    }

    let mut best: Option<CorrelationFinding> = None;
    for (emotion, total, count) in totals {
        if count < config.min_observations {
            continue;
        }
        let emotion_average = total as f64 / count as f64;
        let deviation = (emotion_average - global_average) / global_average * 100.0;
        if deviation <= config.materiality_threshold_pct {
            continue;
        }
        if best.as_ref().map_or(true, |b| deviation > b.deviation_percent) {
            best = Some(CorrelationFinding {
                emotion,
                deviation_percent: deviation,
                emotion_average,
                global_average,
                count,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn rec(id: i64, amount: i64, emotion: Emotion) -> ExpenseRecord {
        let date = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        ExpenseRecord::new(id, "x", amount, Category::Other, emotion, date)
    }

    fn scenario() -> Vec<ExpenseRecord> {
        vec![
            rec(1, 50000, Emotion::Stressed),
            rec(2, 10000, Emotion::Neutral),
            rec(3, 60000, Emotion::Stressed),
        ]
    }

    #[test]
    fn test_too_few_records() {
        assert_eq!(detect(&scenario(), &CorrelationConfig::default()), None);
    }

    #[test]
    fn test_scenario_with_lowered_sample_floor() {
        let config = CorrelationConfig {
            min_records: 3,
            ..Default::default()
        };
        let finding = detect(&scenario(), &config).unwrap();
        assert_eq!(finding.emotion, Emotion::Stressed);
        assert!((finding.deviation_percent - 37.5).abs() < 1e-9);
        assert!((finding.emotion_average - 55000.0).abs() < 1e-9);
        assert!((finding.global_average - 40000.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_amounts_never_correlate() {
        let records: Vec<ExpenseRecord> = Emotion::all()
            .iter()
            .cycle()
            .take(12)
            .enumerate()
            .map(|(i, e)| rec(i as i64, 25000, e.clone()))
            .collect();
        assert_eq!(detect(&records, &CorrelationConfig::default()), None);
    }

    #[test]
    fn test_zero_global_average() {
        let records: Vec<ExpenseRecord> = (0..6).map(|i| rec(i, 0, Emotion::Sad)).collect();
        assert_eq!(detect(&records, &CorrelationConfig::default()), None);
    }

    #[test]
    fn test_single_observation_ignored() {
        // Angry has one huge purchase but only one observation
        let records = vec![
            rec(1, 1_000_000, Emotion::Angry),
            rec(2, 10000, Emotion::Neutral),
            rec(3, 10000, Emotion::Neutral),
            rec(4, 12000, Emotion::Happy),
            rec(5, 12000, Emotion::Happy),
        ];
        let finding = detect(&records, &CorrelationConfig::default());
        assert!(finding.map_or(true, |f| f.emotion != Emotion::Angry));
    }

    #[test]
    fn test_below_threshold() {
        // Happy averages 11000 vs global 10400: +5.8%
        let records = vec![
            rec(1, 11000, Emotion::Happy),
            rec(2, 11000, Emotion::Happy),
            rec(3, 10000, Emotion::Neutral),
            rec(4, 10000, Emotion::Neutral),
            rec(5, 10000, Emotion::Neutral),
        ];
        assert_eq!(detect(&records, &CorrelationConfig::default()), None);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let records = vec![
            rec(1, 1000, Emotion::Neutral),
            rec(2, 1000, Emotion::Neutral),
            rec(3, 5000, Emotion::Sad),
            rec(4, 5000, Emotion::Sad),
            rec(5, 5000, Emotion::Angry),
            rec(6, 5000, Emotion::Angry),
        ];
        let finding = detect(&records, &CorrelationConfig::default()).unwrap();
        assert_eq!(finding.emotion, Emotion::Sad);
    }

    #[test]
    fn test_largest_deviation_wins() {
        let records = vec![
            rec(1, 1000, Emotion::Neutral),
            rec(2, 1000, Emotion::Neutral),
            rec(3, 1000, Emotion::Neutral),
            rec(4, 4000, Emotion::Sad),
            rec(5, 4000, Emotion::Sad),
            rec(6, 9000, Emotion::Stressed),
            rec(7, 9000, Emotion::Stressed),
        ];
        let finding = detect(&records, &CorrelationConfig::default()).unwrap();
        assert_eq!(finding.emotion, Emotion::Stressed);
    }
}
