//! Emotion summaries and the mood/value projection

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Emotion, ExpenseRecord};

/// Spending attributed to one emotion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSummary {
    pub emotion: Emotion,
    pub total: i64,
    pub count: i64,
    /// Share of the grand total, 0-100, rounded half up; shares total 99-101
    pub percentage: u32,
}

/// Per-emotion `(total, count)` in first-occurrence order
pub(crate) fn emotion_totals(records: &[ExpenseRecord]) -> Vec<(Emotion, i64, i64)> {
    let mut totals: Vec<(Emotion, i64, i64)> = Vec::new();
    for record in records {
        let amount = record.amount_value();
        match totals.iter_mut().find(|(e, _, _)| *e == record.emotion_label) {
            Some((_, total, count)) => {
                *total = total.saturating_add(amount);
                *count += 1;
            }
            None => totals.push((record.emotion_label.clone(), amount, 1)),
        }
    }
    totals
}

/// `round(part / whole * 100)` with halves rounded up, in integer arithmetic
pub fn percent_of(part: i64, whole: i64) -> u32 {
    if whole <= 0 || part <= 0 {
        return 0;
    }
    let part = part as i128;
    let whole = whole as i128;
    ((part * 200 + whole) / (whole * 2)) as u32
}

/// Whole percentages of `parts`, each rounded half up
///
/// When the rounded shares drift outside 99..=101 in total, the shares with
/// the largest rounding error are nudged back one point each. Ties go to the
/// earlier part. All zeros when the parts sum to nothing.
fn percentages(parts: &[i64]) -> Vec<u32> {
    let whole: i128 = parts.iter().map(|&p| i128::from(p.max(0))).sum();
    if whole == 0 {
        return vec![0; parts.len()];
    }

    // (rounded share, rounding error in units of 1/whole percent)
    let mut shares: Vec<(u32, i128)> = parts
        .iter()
        .map(|&p| {
            let scaled = i128::from(p.max(0)) * 100;
            let rounded = (scaled * 2 + whole) / (whole * 2);
            (rounded as u32, rounded * whole - scaled)
        })
        .collect();

    let sum: u32 = shares.iter().map(|(share, _)| share).sum();
    let mut order: Vec<usize> = (0..shares.len()).collect();
    if sum > 101 {
        order.sort_by(|&a, &b| shares[b].1.cmp(&shares[a].1));
        for &i in order.iter().take((sum - 101) as usize) {
            shares[i].0 = shares[i].0.saturating_sub(1);
        }
    } else if sum < 99 {
        order.sort_by(|&a, &b| shares[a].1.cmp(&shares[b].1));
        for &i in order.iter().take((99 - sum) as usize) {
            shares[i].0 += 1;
        }
    }

    shares.into_iter().map(|(share, _)| share).collect()
}

/// Summarize spending per emotion, biggest total first
///
/// Ties keep the order in which emotions first appear. Percentages always
/// add up to within one point of 100 for a non-zero grand total.
pub fn summarize(records: &[ExpenseRecord]) -> Vec<EmotionSummary> {
    let totals = emotion_totals(records);
    let shares = percentages(&totals.iter().map(|(_, total, _)| *total).collect::<Vec<_>>());

    let mut summaries: Vec<EmotionSummary> = totals
        .into_iter()
        .zip(shares)
        .map(|((emotion, total, count), percentage)| EmotionSummary {
            emotion,
            total,
            count,
            percentage,
        })
        .collect();

    // sort_by is stable
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

/// The emotion with the highest total spend, if any
pub fn dominant(summaries: &[EmotionSummary]) -> Option<&EmotionSummary> {
    summaries.first()
}

/// One point of the mood vs value scatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPoint {
    /// Mood score (negative = bad mood)
    pub x: f64,
    /// Amount spent
    pub y: i64,
    pub item: String,
    pub emotion: Emotion,
    pub date: Option<NaiveDateTime>,
}

/// Project records onto mood (x) and amount (y)
///
/// Emotions without a fixed score fall back to the record's sentiment score
/// (stretched from -1..1 to -2..2) when one is present.
pub fn mood_points(records: &[ExpenseRecord]) -> Vec<MoodPoint> {
    records
        .iter()
        .map(|record| {
            let mut x = record.emotion_label.mood_score();
            if x == 0.0 {
                if let Some(sentiment) = record.sentiment_score.filter(|s| *s != 0.0) {
                    x = sentiment.clamp(-1.0, 1.0) * 2.0;
                }
            }
            MoodPoint {
                x,
                y: record.amount_value(),
                item: record.item_name.clone(),
                emotion: record.emotion_label.clone(),
                date: record.date,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn rec(id: i64, amount: i64, emotion: Emotion) -> ExpenseRecord {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        ExpenseRecord::new(id, "x", amount, Category::Other, emotion, date)
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize(&[]).is_empty());
        assert!(dominant(&[]).is_none());
    }

    #[test]
    fn test_scenario_summary() {
        let records = vec![
            rec(1, 50000, Emotion::Stressed),
            rec(2, 10000, Emotion::Neutral),
            rec(3, 60000, Emotion::Stressed),
        ];
        let summaries = summarize(&records);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].emotion, Emotion::Stressed);
        assert_eq!(summaries[0].total, 110000);
        assert_eq!(summaries[0].count, 2);
        // 91.67% rounds to 92
        assert_eq!(summaries[0].percentage, 92);
        assert_eq!(summaries[1].percentage, 8);
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(percent_of(1, 8), 13); // 12.5
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 67);
        assert_eq!(percent_of(0, 0), 0);
        assert_eq!(percent_of(5, 0), 0);
    }

    #[test]
    fn test_zero_grand_total() {
        let records = vec![rec(1, 0, Emotion::Happy), rec(2, 0, Emotion::Sad)];
        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 2);
        assert!(summaries.iter().all(|s| s.percentage == 0));
        // Equal totals keep first-seen order
        assert_eq!(summaries[0].emotion, Emotion::Happy);
    }

    #[test]
    fn test_percentages_sum_near_hundred() {
        let emotions = Emotion::all();
        for seed in 1..40i64 {
            let records: Vec<ExpenseRecord> = (0..seed)
                .map(|i| rec(i, (i * 7717 + seed * 131) % 50_000 + 1, emotions[(i % 6) as usize].clone()))
                .collect();
            let sum: u32 = summarize(&records).iter().map(|s| s.percentage).sum();
            assert!((99..=101).contains(&sum), "seed {} sum {}", seed, sum);
        }
    }

    #[test]
    fn test_six_equal_shares_stay_near_hundred() {
        // 16.67% each rounds up to 17, which alone would total 102
        let records: Vec<ExpenseRecord> = Emotion::all()
            .iter()
            .enumerate()
            .map(|(i, emotion)| rec(i as i64, 1000, emotion.clone()))
            .collect();
        let summaries = summarize(&records);

        assert_eq!(summaries.len(), 6);
        let sum: u32 = summaries.iter().map(|s| s.percentage).sum();
        assert_eq!(sum, 101);
        assert!(summaries.iter().all(|s| s.percentage == 16 || s.percentage == 17));
        // The earliest emotion gives up the extra point
        assert_eq!(summaries[0].percentage, 16);
    }

    #[test]
    fn test_thirds_keep_plain_rounding() {
        let records = vec![
            rec(1, 1, Emotion::Happy),
            rec(2, 1, Emotion::Sad),
            rec(3, 1, Emotion::Angry),
        ];
        let shares: Vec<u32> = summarize(&records).iter().map(|s| s.percentage).collect();
        assert_eq!(shares, vec![33, 33, 33]);
    }

    #[test]
    fn test_many_small_shares_round_up_to_ninety_nine() {
        // Seven shares of 14.29% round down to 98 in total
        let records: Vec<ExpenseRecord> = (0..7)
            .map(|i| rec(i, 1, Emotion::Unlisted(format!("rasa-{}", i))))
            .collect();
        let sum: u32 = summarize(&records).iter().map(|s| s.percentage).sum();
        assert_eq!(sum, 99);
    }

    #[test]
    fn test_huge_totals_saturate() {
        let records = vec![
            rec(1, i64::MAX, Emotion::Sad),
            rec(2, i64::MAX, Emotion::Sad),
            rec(3, i64::MAX, Emotion::Happy),
        ];
        let summaries = summarize(&records);

        assert_eq!(summaries[0].emotion, Emotion::Sad);
        assert_eq!(summaries[0].total, i64::MAX);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].percentage, 50);
        assert_eq!(summaries[1].percentage, 50);
    }

    #[test]
    fn test_unlisted_emotion_kept_by_name() {
        let records = vec![
            rec(1, 100, Emotion::Unlisted("Bahagia".to_string())),
            rec(2, 50, Emotion::Happy),
        ];
        let summaries = summarize(&records);
        assert_eq!(summaries[0].emotion.as_str(), "Bahagia");
    }

    #[test]
    fn test_mood_points() {
        let mut neutral = rec(2, 1000, Emotion::Neutral);
        neutral.sentiment_score = Some(-0.5);
        let records = vec![rec(1, 5000, Emotion::Angry), neutral, rec(3, 10, Emotion::Happy)];
        let points = mood_points(&records);

        assert_eq!(points[0].x, -2.0);
        assert_eq!(points[0].y, 5000);
        assert_eq!(points[1].x, -1.0);
        assert_eq!(points[2].x, 2.0);
    }
}
