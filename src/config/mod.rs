use std::env;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Institutional parameters that govern academic rules. Loaded once at the
/// edge and passed into the core explicitly; nothing in the engine reads
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicPolicy {
    /// Minimum grade (0-10) to pass a course.
    pub min_passing_grade: f64,
    /// Minimum attendance percentage (0-100) to pass a course.
    pub min_attendance: f64,
    /// Maximum simultaneous enrollments per student per period; 0 means
    /// unlimited.
    pub max_sections_per_period: u32,
    /// Last day on which a student may withdraw from an enrollment.
    pub withdrawal_deadline: NaiveDate,
    /// Number of students shown in CR rankings.
    pub ranking_size: usize,
}

impl Default for AcademicPolicy {
    fn default() -> Self {
        Self {
            min_passing_grade: 6.0,
            min_attendance: 75.0,
            max_sections_per_period: 6,
            withdrawal_deadline: NaiveDate::from_ymd_opt(2025, 12, 15).expect("literal in range"),
            ranking_size: 10,
        }
    }
}

impl AcademicPolicy {
    /// Loads policy values from the environment (`CAMPUS_*` variables),
    /// falling back to institutional defaults per variable.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let policy = Self {
            min_passing_grade: env_parsed("CAMPUS_MIN_GRADE", defaults.min_passing_grade)?,
            min_attendance: env_parsed("CAMPUS_MIN_ATTENDANCE", defaults.min_attendance)?,
            max_sections_per_period: env_parsed(
                "CAMPUS_MAX_SECTIONS_PER_PERIOD",
                defaults.max_sections_per_period,
            )?,
            withdrawal_deadline: env_date(
                "CAMPUS_WITHDRAWAL_DEADLINE",
                defaults.withdrawal_deadline,
            )?,
            ranking_size: env_parsed("CAMPUS_RANKING_SIZE", defaults.ranking_size)?,
        };
        policy.validated()
    }

    /// Parses a JSON policy document (the settings-file format used by the
    /// institutional tooling).
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let policy: Self = serde_json::from_str(raw)?;
        policy.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if !(0.0..=10.0).contains(&self.min_passing_grade) {
            return Err(ConfigError::GradeBounds(self.min_passing_grade));
        }
        if !(0.0..=100.0).contains(&self.min_attendance) {
            return Err(ConfigError::AttendanceBounds(self.min_attendance));
        }
        if self.ranking_size == 0 {
            return Err(ConfigError::RankingSize);
        }
        Ok(self)
    }

    /// Whether a withdrawal requested on `date` is still inside the window.
    pub fn can_withdraw_on(&self, date: NaiveDate) -> bool {
        date <= self.withdrawal_deadline
    }
}

fn env_parsed<T: std::str::FromStr>(variable: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidVariable {
                variable,
                value: raw,
            }),
        Err(_) => Ok(default),
    }
}

fn env_date(variable: &'static str, default: NaiveDate) -> Result<NaiveDate, ConfigError> {
    match env::var(variable) {
        Ok(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            ConfigError::InvalidVariable {
                variable,
                value: raw,
            }
        }),
        Err(_) => Ok(default),
    }
}

/// Errors produced while loading or validating institutional policy.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("minimum passing grade must be between 0 and 10, got {0}")]
    GradeBounds(f64),
    #[error("minimum attendance must be between 0 and 100, got {0}")]
    AttendanceBounds(f64),
    #[error("ranking size must be greater than zero")]
    RankingSize,
    #[error("invalid value for {variable}: '{value}'")]
    InvalidVariable {
        variable: &'static str,
        value: String,
    },
    #[error("malformed policy document: {0}")]
    Malformed(#[from] serde_json::Error),
}
