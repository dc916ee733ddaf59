use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::employee::*;
use crate::pipeline::KpiColumns;

/// Columns of a scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSpec {
    pub x: String,
    pub y: String,
    pub color: String,
    #[serde(default)]
    pub size: Option<String>,
}

/// Columns of a grouped box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub group: String,
    pub value: String,
}

/// What the dashboard filters on and which columns feed each chart.
///
/// Every field has a default matching the employee table, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Column whose values must be unique.
    pub id_column: String,
    /// Columns offered as multi-select filters.
    pub filter_columns: Vec<String>,
    pub kpi: KpiColumns,
    /// Column shown as a count distribution.
    pub distribution_column: String,
    pub salary_vs_performance: ScatterSpec,
    pub experience_vs_salary: ScatterSpec,
    pub satisfaction_by_group: GroupSpec,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            id_column: EMPLOYEE_ID.to_string(),
            filter_columns: vec![JOB_TITLE.to_string(), EDUCATION_LEVEL.to_string()],
            kpi: KpiColumns::default(),
            distribution_column: PERFORMANCE_SCORE.to_string(),
            salary_vs_performance: ScatterSpec {
                x: PERFORMANCE_SCORE.to_string(),
                y: MONTHLY_SALARY.to_string(),
                color: JOB_TITLE.to_string(),
                size: Some(YEARS_AT_COMPANY.to_string()),
            },
            experience_vs_salary: ScatterSpec {
                x: YEARS_AT_COMPANY.to_string(),
                y: MONTHLY_SALARY.to_string(),
                color: EDUCATION_LEVEL.to_string(),
                size: None,
            },
            satisfaction_by_group: GroupSpec {
                group: JOB_TITLE.to_string(),
                value: SATISFACTION_SCORE.to_string(),
            },
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("loaded dashboard config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{ "filter_columns": ["Gender"], "kpi": { "salary": "Pay" } }"#,
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.filter_columns, vec!["Gender"]);
        assert_eq!(config.kpi.salary, "Pay");
        assert_eq!(config.kpi.performance, PERFORMANCE_SCORE);
        assert_eq!(config.id_column, EMPLOYEE_ID);
        assert_eq!(config.experience_vs_salary.size, None);
    }

    #[test]
    fn test_config_round_trip() {
        let config = DashboardConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DashboardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_bad_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("parsing config"));
    }
}
