//! Statistics aggregation over expense records

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::{Category, ExpenseRecord};

/// Per-category totals in first-seen order
///
/// Serializes as a JSON object `{name: amount}` whose key order is the order
/// categories were first encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals(Vec<(Category, i64)>);

impl CategoryTotals {
    pub fn add(&mut self, category: &Category, amount: i64) {
        match self.0.iter_mut().find(|(c, _)| c == category) {
            Some((_, total)) => *total = total.saturating_add(amount),
            None => self.0.push((category.clone(), amount)),
        }
    }

    pub fn get(&self, category: &Category) -> Option<i64> {
        self.0.iter().find(|(c, _)| c == category).map(|(_, t)| *t)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Category, i64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> i64 {
        self.0.iter().fold(0, |acc, (_, t)| acc.saturating_add(*t))
    }

    /// Collect totals from records
    pub fn from_records(records: &[ExpenseRecord]) -> Self {
        let mut totals = Self::default();
        for record in records {
            totals.add(&record.category, record.amount_value());
        }
        totals
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, total) in &self.0 {
            map.serialize_entry(category.as_str(), total)?;
        }
        map.end()
    }
}

/// The single biggest expense in a set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighestExpense {
    pub id: i64,
    pub item: String,
    pub amount: i64,
    pub date: NaiveDateTime,
}

/// Aggregate statistics for a record set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total: i64,
    pub count: i64,
    /// Floor of `total / count`, 0 when empty
    pub average: i64,
    pub highest: Option<HighestExpense>,
    pub categories: CategoryTotals,
}

/// Something wrong with an input record that analytics worked around
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordWarning {
    /// Amount missing or not a number; counted as 0
    MissingAmount { id: i64 },
    /// Amount below zero; counted as 0
    NegativeAmount { id: i64, amount: i64 },
    /// No timestamp; excluded from date-based highlights
    MissingDate { id: i64 },
}

/// Report malformed fields without touching the records
pub fn inspect(records: &[ExpenseRecord]) -> Vec<RecordWarning> {
    let mut warnings = Vec::new();
    for record in records {
        match record.amount {
            None => warnings.push(RecordWarning::MissingAmount { id: record.id }),
            Some(amount) if amount < 0 => warnings.push(RecordWarning::NegativeAmount {
                id: record.id,
                amount,
            }),
            Some(_) => {}
        }
        if record.date.is_none() {
            warnings.push(RecordWarning::MissingDate { id: record.id });
        }
    }
    warnings
}

/// Reduce records into a `StatsSnapshot` in a single pass
///
/// Ties for the highest record keep the first one seen. Records without a
/// date still count toward totals but cannot be the highlight.
pub fn aggregate(records: &[ExpenseRecord]) -> StatsSnapshot {
    let mut total: i64 = 0;
    let mut count: i64 = 0;
    let mut categories = CategoryTotals::default();
    let mut highest: Option<HighestExpense> = None;

    for record in records {
        let amount = record.amount_value();
        total = total.saturating_add(amount);
        count += 1;
        categories.add(&record.category, amount);

        let Some(date) = record.date else {
            tracing::warn!(record_id = record.id, "Expense has no date, skipped for highlights");
            continue;
        };
        if highest.as_ref().map_or(true, |h| amount > h.amount) {
            highest = Some(HighestExpense {
                id: record.id,
                item: record.item_name.clone(),
                amount,
                date,
            });
        }
    }

    let malformed = records
        .iter()
        .filter(|r| r.amount.map_or(true, |a| a < 0))
        .count();
    if malformed > 0 {
        tracing::warn!(count = malformed, "Expenses with missing or invalid amount counted as 0");
    }

    StatsSnapshot {
        total,
        count,
        average: if count > 0 { total / count } else { 0 },
        highest,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Emotion;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn record(id: i64, amount: i64, category: Category, emotion: Emotion) -> ExpenseRecord {
        ExpenseRecord::new(id, format!("item-{}", id), amount, category, emotion, day(id as u32))
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = aggregate(&[]);
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.average, 0);
        assert!(snapshot.highest.is_none());
        assert!(snapshot.categories.is_empty());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total": 0, "count": 0, "average": 0, "highest": null, "categories": {}})
        );
    }

    #[test]
    fn test_scenario_totals() {
        let records = vec![
            record(1, 50000, Category::FoodAndDrink, Emotion::Stressed),
            record(2, 10000, Category::Transport, Emotion::Neutral),
            record(3, 60000, Category::FoodAndDrink, Emotion::Stressed),
        ];
        let snapshot = aggregate(&records);

        assert_eq!(snapshot.total, 120000);
        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.average, 40000);
        assert_eq!(snapshot.categories.get(&Category::FoodAndDrink), Some(110000));
        assert_eq!(snapshot.categories.get(&Category::Transport), Some(10000));
        assert_eq!(snapshot.categories.sum(), snapshot.total);
        assert_eq!(snapshot.highest.unwrap().id, 3);
    }

    #[test]
    fn test_average_floors() {
        let records = vec![
            record(1, 10, Category::Other, Emotion::Neutral),
            record(2, 11, Category::Other, Emotion::Neutral),
        ];
        assert_eq!(aggregate(&records).average, 10);
    }

    #[test]
    fn test_highest_tie_keeps_first() {
        let records = vec![
            record(1, 500, Category::Other, Emotion::Neutral),
            record(2, 900, Category::Other, Emotion::Neutral),
            record(3, 900, Category::Other, Emotion::Neutral),
        ];
        assert_eq!(aggregate(&records).highest.unwrap().id, 2);
    }

    #[test]
    fn test_malformed_records_are_counted_not_dropped() {
        let mut missing_amount = record(1, 0, Category::Other, Emotion::Neutral);
        missing_amount.amount = None;
        let mut undated = record(2, 99999, Category::Shopping, Emotion::Happy);
        undated.date = None;
        let negative = record(3, -500, Category::Shopping, Emotion::Happy);
        let normal = record(4, 2000, Category::Unlisted("Hobi".to_string()), Emotion::Happy);

        let records = vec![missing_amount, undated, negative, normal];
        let snapshot = aggregate(&records);

        assert_eq!(snapshot.count, 4);
        assert_eq!(snapshot.total, 101999);
        assert_eq!(snapshot.categories.sum(), snapshot.total);
        // The undated record is the biggest but cannot be the highlight
        assert_eq!(snapshot.highest.unwrap().id, 4);

        let warnings = inspect(&records);
        assert!(warnings.contains(&RecordWarning::MissingAmount { id: 1 }));
        assert!(warnings.contains(&RecordWarning::MissingDate { id: 2 }));
        assert!(warnings.contains(&RecordWarning::NegativeAmount { id: 3, amount: -500 }));
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_categories_keep_first_seen_order() {
        let records = vec![
            record(1, 100, Category::Transport, Emotion::Neutral),
            record(2, 300, Category::Bills, Emotion::Neutral),
            record(3, 200, Category::Transport, Emotion::Neutral),
        ];
        let snapshot = aggregate(&records);
        let json = serde_json::to_string(&snapshot.categories).unwrap();
        assert_eq!(json, r#"{"Transport":300,"Tagihan":300}"#);
    }

    #[test]
    fn test_category_sum_matches_total_for_varied_sets() {
        let categories = Category::all();
        for size in [1usize, 2, 7, 31] {
            let records: Vec<ExpenseRecord> = (0..size)
                .map(|i| {
                    let mut r = record(
                        i as i64 + 1,
                        (i as i64 * 7919) % 100_000,
                        categories[i % categories.len()].clone(),
                        Emotion::Neutral,
                    );
                    r.date = Some(day(1));
                    r
                })
                .collect();
            let snapshot = aggregate(&records);
            assert_eq!(snapshot.categories.sum(), snapshot.total, "size {}", size);
            assert_eq!(snapshot.count, size as i64);
        }
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let records = vec![
            record(1, i64::MAX, Category::Shopping, Emotion::Happy),
            record(2, i64::MAX, Category::Shopping, Emotion::Happy),
            record(3, i64::MAX, Category::Bills, Emotion::Sad),
        ];
        let snapshot = aggregate(&records);

        assert_eq!(snapshot.total, i64::MAX);
        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.average, i64::MAX / 3);
        assert_eq!(snapshot.categories.get(&Category::Shopping), Some(i64::MAX));
        assert_eq!(snapshot.categories.get(&Category::Bills), Some(i64::MAX));
        assert_eq!(snapshot.categories.sum(), snapshot.total);
        assert_eq!(snapshot.highest.unwrap().id, 1);
    }
}
