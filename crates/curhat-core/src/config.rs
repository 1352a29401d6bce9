//! Analytics configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/curhat/config/analytics.toml) when it exists
//! 2. The embedded defaults compiled into the binary

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Emotion;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Thresholds for the correlation detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    pub min_records: usize,
    pub min_observations: i64,
    pub materiality_threshold_pct: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_records: 5,
            min_observations: 2,
            materiality_threshold_pct: 20.0,
        }
    }
}

/// Parameters of the default regret-audit candidate policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    pub emotions: Vec<Emotion>,
    pub min_age_hours: i64,
    pub max_candidates: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            emotions: vec![Emotion::Sad, Emotion::Angry, Emotion::Stressed],
            min_age_hours: 48,
            max_candidates: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Number of most recent records the dashboard looks at
    pub recent_window: usize,
    pub top_categories: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_window: 500,
            top_categories: 5,
        }
    }
}

/// All tunable analytics parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub correlation: CorrelationConfig,
    pub audit: AuditConfig,
    pub dashboard: DashboardConfig,
}

impl AnalyticsConfig {
    /// Load from the data-dir override if present, else the embedded default
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse TOML content; absent sections and keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("curhat").join("config").join("analytics.toml"))
}

fn load_config(override_path: Option<&Path>) -> Result<AnalyticsConfig> {
    let path = match override_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => default_config_path().filter(|p| p.exists()),
    };

    let content = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading analytics config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        None => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    correlation: Option<RawCorrelation>,
    audit: Option<RawAudit>,
    dashboard: Option<RawDashboard>,
}

#[derive(Debug, Deserialize)]
struct RawCorrelation {
    min_records: Option<usize>,
    min_observations: Option<i64>,
    materiality_threshold_pct: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAudit {
    emotions: Option<Vec<String>>,
    min_age_hours: Option<i64>,
    max_candidates: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawDashboard {
    recent_window: Option<usize>,
    top_categories: Option<usize>,
}

fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(c) = raw.correlation {
        if let Some(v) = c.min_records {
            config.correlation.min_records = v;
        }
        if let Some(v) = c.min_observations {
            config.correlation.min_observations = v.max(1);
        }
        if let Some(v) = c.materiality_threshold_pct {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Config(format!(
                    "materiality_threshold_pct must be a non-negative number, got {}",
                    v
                )));
            }
            config.correlation.materiality_threshold_pct = v;
        }
    }

    if let Some(a) = raw.audit {
        if let Some(labels) = a.emotions {
            config.audit.emotions = labels
                .iter()
                .map(|l| Emotion::from_label(Some(l)))
                .collect();
        }
        if let Some(v) = a.min_age_hours {
            config.audit.min_age_hours = v;
        }
        if let Some(v) = a.max_candidates {
            config.audit.max_candidates = v;
        }
    }

    if let Some(d) = raw.dashboard {
        if let Some(v) = d.recent_window {
            config.dashboard.recent_window = v;
        }
        if let Some(v) = d.top_categories {
            config.dashboard.top_categories = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = AnalyticsConfig::from_toml(
            r#"
            [correlation]
            min_records = 3

            [audit]
            emotions = ["Stress", "lapar"]
            "#,
        )
        .unwrap();

        assert_eq!(config.correlation.min_records, 3);
        assert_eq!(config.correlation.min_observations, 2);
        assert_eq!(config.audit.emotions, vec![Emotion::Stressed, Emotion::Hungry]);
        assert_eq!(config.audit.min_age_hours, 48);
        assert_eq!(config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AnalyticsConfig::from_toml("[correlation\nmin_records = 1"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AnalyticsConfig::from_toml("[correlation]\nmateriality_threshold_pct = -5.0"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.toml");
        std::fs::write(&path, "[dashboard]\ntop_categories = 3\n").unwrap();

        let config = AnalyticsConfig::load_from(&path).unwrap();
        assert_eq!(config.dashboard.top_categories, 3);
        assert_eq!(config.dashboard.recent_window, 500);

        let missing = AnalyticsConfig::load_from(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(Error::Config(_))));
    }
}
