//! Data models for Curhat

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Emotion tagged on an expense
///
/// The six product labels are Indonesian; English names are accepted on input.
/// Any other non-empty label is kept verbatim as `Unlisted`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Stressed,
    Hungry,
    #[default]
    Neutral,
    Unlisted(String),
}

impl Emotion {
    pub fn as_str(&self) -> &str {
        match self {
            Emotion::Happy => "Senang",
            Emotion::Sad => "Sedih",
            Emotion::Angry => "Marah",
            Emotion::Stressed => "Stress",
            Emotion::Hungry => "Lapar",
            Emotion::Neutral => "Netral",
            Emotion::Unlisted(label) => label,
        }
    }

    /// Parse a label, falling back to `Neutral` when missing or blank
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(raw) = label.map(str::trim).filter(|s| !s.is_empty()) else {
            return Emotion::Neutral;
        };
        match raw.to_lowercase().as_str() {
            "senang" | "happy" => Emotion::Happy,
            "sedih" | "sad" => Emotion::Sad,
            "marah" | "angry" => Emotion::Angry,
            "stress" | "stres" | "stressed" => Emotion::Stressed,
            "lapar" | "hungry" => Emotion::Hungry,
            "netral" | "neutral" => Emotion::Neutral,
            _ => Emotion::Unlisted(raw.to_string()),
        }
    }

    /// The closed set of product emotions
    pub fn all() -> &'static [Emotion] {
        &[
            Emotion::Happy,
            Emotion::Sad,
            Emotion::Angry,
            Emotion::Stressed,
            Emotion::Hungry,
            Emotion::Neutral,
        ]
    }

    /// Position on the mood axis of the mood/value scatter (negative = bad mood)
    pub fn mood_score(&self) -> f64 {
        match self {
            Emotion::Angry => -2.0,
            Emotion::Stressed => -1.5,
            Emotion::Sad => -1.0,
            Emotion::Hungry => -0.5,
            Emotion::Neutral => 0.0,
            Emotion::Happy => 2.0,
            Emotion::Unlisted(_) => 0.0,
        }
    }
}

impl From<Option<String>> for Emotion {
    fn from(label: Option<String>) -> Self {
        Emotion::from_label(label.as_deref())
    }
}

impl From<Emotion> for String {
    fn from(emotion: Emotion) -> Self {
        emotion.as_str().to_string()
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expense category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Category {
    FoodAndDrink,
    Transport,
    Fashion,
    Entertainment,
    Shopping,
    Bills,
    #[default]
    Other,
    Unlisted(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::FoodAndDrink => "Makanan & Minuman",
            Category::Transport => "Transport",
            Category::Fashion => "Fashion",
            Category::Entertainment => "Hiburan",
            Category::Shopping => "Belanja",
            Category::Bills => "Tagihan",
            Category::Other => "Lainnya",
            Category::Unlisted(name) => name,
        }
    }

    /// Parse a category name, falling back to `Other` when missing or blank
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(raw) = label.map(str::trim).filter(|s| !s.is_empty()) else {
            return Category::Other;
        };
        match raw.to_lowercase().as_str() {
            "makanan & minuman" | "makanan" | "food" | "food & drink" | "food and drink" => {
                Category::FoodAndDrink
            }
            "transport" | "transportasi" => Category::Transport,
            "fashion" => Category::Fashion,
            "hiburan" | "entertainment" => Category::Entertainment,
            "belanja" | "shopping" => Category::Shopping,
            "tagihan" | "bills" => Category::Bills,
            "lainnya" | "other" => Category::Other,
            _ => Category::Unlisted(raw.to_string()),
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::FoodAndDrink,
            Category::Transport,
            Category::Fashion,
            Category::Entertainment,
            Category::Shopping,
            Category::Bills,
            Category::Other,
        ]
    }
}

impl From<Option<String>> for Category {
    fn from(label: Option<String>) -> Self {
        Category::from_label(label.as_deref())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tri-state regret flag, serialized as `null` / `false` / `true`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum RegretStatus {
    #[default]
    Unset,
    WorthIt,
    Regretted,
}

impl RegretStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegretStatus::Unset => "unset",
            RegretStatus::WorthIt => "worth_it",
            RegretStatus::Regretted => "regretted",
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        (*self).into()
    }
}

impl From<Option<bool>> for RegretStatus {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => RegretStatus::Unset,
            Some(false) => RegretStatus::WorthIt,
            Some(true) => RegretStatus::Regretted,
        }
    }
}

impl From<RegretStatus> for Option<bool> {
    fn from(status: RegretStatus) -> Self {
        match status {
            RegretStatus::Unset => None,
            RegretStatus::WorthIt => Some(false),
            RegretStatus::Regretted => Some(true),
        }
    }
}

/// The binary audit action a user takes on a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegretVerdict {
    Regretted,
    WorthIt,
}

impl From<bool> for RegretVerdict {
    fn from(is_regret: bool) -> Self {
        if is_regret {
            RegretVerdict::Regretted
        } else {
            RegretVerdict::WorthIt
        }
    }
}

impl From<RegretVerdict> for RegretStatus {
    fn from(verdict: RegretVerdict) -> Self {
        match verdict {
            RegretVerdict::Regretted => RegretStatus::Regretted,
            RegretVerdict::WorthIt => RegretStatus::WorthIt,
        }
    }
}

/// A logged expense as read from the store
///
/// Amount and date are optional because upstream rows can be incomplete;
/// analytics coerce them instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    #[serde(default)]
    pub item_name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<i64>,
    #[serde(default)]
    pub category: Category,
    #[serde(default, alias = "emotion")]
    pub emotion_label: Emotion,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, rename = "is_regret", alias = "regret")]
    pub regret: RegretStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
}

impl ExpenseRecord {
    pub fn new(
        id: i64,
        item_name: impl Into<String>,
        amount: i64,
        category: Category,
        emotion: Emotion,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            item_name: item_name.into(),
            amount: Some(amount),
            category,
            emotion_label: emotion,
            date: Some(date),
            regret: RegretStatus::Unset,
            description: None,
            sentiment_score: None,
        }
    }

    pub fn with_regret(mut self, regret: RegretStatus) -> Self {
        self.regret = regret;
        self
    }

    /// Amount used by every aggregation: missing or negative counts as 0
    pub fn amount_value(&self) -> i64 {
        self.amount.filter(|a| *a >= 0).unwrap_or(0)
    }
}

/// Input for logging a new expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub item_name: String,
    pub amount: i64,
    #[serde(default)]
    pub category: Category,
    #[serde(default, alias = "emotion")]
    pub emotion_label: Emotion,
    /// Defaults to "now" at insert time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, rename = "is_regret", alias = "regret")]
    pub regret: RegretStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
}

/// How a savings goal's tracking window is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    #[default]
    ThisMonth,
    ThisWeek,
    Custom,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::ThisMonth => "this_month",
            PeriodType::ThisWeek => "this_week",
            PeriodType::Custom => "custom",
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "this_month" => Ok(PeriodType::ThisMonth),
            "this_week" => Ok(PeriodType::ThisWeek),
            "custom" => Ok(PeriodType::Custom),
            _ => Err(format!("Unknown period type: {}", s)),
        }
    }
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings / spending-budget goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: i64,
    /// Spending matched to this goal in its resolved period (derived by the store)
    #[serde(default)]
    pub current_amount: i64,
    #[serde(default)]
    pub period_type: PeriodType,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub period_start: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub period_end: Option<NaiveDateTime>,
}

/// Input for creating a savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: i64,
}

/// Summary of money marked as regretted ("dana terbuang")
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegretStats {
    pub total_wasted: i64,
    pub count: i64,
}

/// Parse the timestamp formats seen in stored and submitted records
///
/// Accepts ISO 8601 with or without a trailing `Z`, offsets, fractional
/// seconds, a space separator, or a bare date (midnight).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    let s = s.trim_end_matches('Z');
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Amounts arrive as integers, floats, numeric strings, or garbage.
/// Anything non-numeric becomes `None`.
fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Int(v)) => Some(v),
        Some(RawAmount::Float(v)) if v.is_finite() => Some(v.trunc() as i64),
        Some(RawAmount::Text(s)) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
        }
        _ => None,
    })
}

pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
