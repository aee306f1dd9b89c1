//! User settings
//!
//! Settings are a per-user singleton owned by the storage collaborator. Missing
//! fields fall back to the defaults below, and `validate` is the gate that keeps
//! nonsensical configurations away from the pacing math.

use serde::{Deserialize, Serialize};

use crate::error::ComputeError;

/// Default daily goal (ml)
pub const DEFAULT_DAILY_GOAL_ML: f64 = 2000.0;

/// Default start of the active window (hour of day)
pub const DEFAULT_WAKE_HOUR: u32 = 9;

/// Default end of the active window (hour of day)
pub const DEFAULT_SLEEP_HOUR: u32 = 22;

/// Default checkpoint interval (minutes)
pub const DEFAULT_STEP_MINUTES: u32 = 60;

/// Default quick-add amounts (ml)
pub const DEFAULT_QUICK_AMOUNTS_ML: [f64; 5] = [150.0, 250.0, 330.0, 500.0, 750.0];

/// Pacing configuration for a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Daily intake goal (ml)
    pub daily_goal_ml: f64,
    /// Hour (0-23) at which the active window opens
    pub wake_hour: u32,
    /// Hour (0-23) at which the active window closes
    pub sleep_hour: u32,
    /// Spacing between guidance checkpoints (minutes)
    pub step_minutes: u32,
    /// Amounts offered as one-tap buttons (ml)
    pub quick_amounts_ml: Vec<f64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal_ml: DEFAULT_DAILY_GOAL_ML,
            wake_hour: DEFAULT_WAKE_HOUR,
            sleep_hour: DEFAULT_SLEEP_HOUR,
            step_minutes: DEFAULT_STEP_MINUTES,
            quick_amounts_ml: DEFAULT_QUICK_AMOUNTS_ML.to_vec(),
        }
    }
}

impl Settings {
    /// Load settings from JSON, filling absent fields with defaults
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Reject configurations the engine cannot pace against
    pub fn validate(&self) -> Result<(), ComputeError> {
        if !self.daily_goal_ml.is_finite() || self.daily_goal_ml <= 0.0 {
            return Err(ComputeError::InvalidSettings(format!(
                "daily_goal_ml must be positive, got {}",
                self.daily_goal_ml
            )));
        }

        if self.wake_hour > 23 {
            return Err(ComputeError::InvalidSettings(format!(
                "wake_hour must be within 0-23, got {}",
                self.wake_hour
            )));
        }

        if self.sleep_hour > 23 {
            return Err(ComputeError::InvalidSettings(format!(
                "sleep_hour must be within 0-23, got {}",
                self.sleep_hour
            )));
        }

        if self.step_minutes == 0 {
            return Err(ComputeError::InvalidSettings(
                "step_minutes must be positive".to_string(),
            ));
        }

        if self.quick_amounts_ml.is_empty() {
            return Err(ComputeError::InvalidSettings(
                "quick_amounts_ml must not be empty".to_string(),
            ));
        }

        if let Some(bad) = self
            .quick_amounts_ml
            .iter()
            .find(|amount| !amount.is_finite() || **amount <= 0.0)
        {
            return Err(ComputeError::InvalidSettings(format!(
                "quick amounts must be positive, got {}",
                bad
            )));
        }

        Ok(())
    }
}

/// Parse a user-typed quick amount list such as `"150, 250 330"`.
///
/// Parts that are not positive numbers are dropped; the result is
/// deduplicated and sorted ascending. Returns `None` when nothing usable
/// remains.
pub fn parse_quick_amounts(text: &str) -> Option<Vec<f64>> {
    let mut amounts: Vec<f64> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n > 0.0)
        .collect();

    if amounts.is_empty() {
        return None;
    }

    amounts.sort_by(|a, b| a.total_cmp(b));
    amounts.dedup();
    Some(amounts)
}
