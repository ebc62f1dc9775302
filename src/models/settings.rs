//! Daily risk settings shared by every calculator.

use serde::{Deserialize, Serialize};

/// Singleton daily risk budget.
///
/// A value of `0.0` means "not configured"; calculators treat non-positive
/// settings as disabled and produce no result rather than erroring.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySettings {
    /// Monetary amount the user is willing to lose on a single trade/day.
    #[serde(default)]
    pub risk_capital: f64,
    /// Global target-profit-to-risk ratio applied when no per-plan reward
    /// multiple is given.
    #[serde(default)]
    pub risk_reward_ratio: f64,
}

impl DailySettings {
    /// Both values present and positive.
    pub fn is_valid(&self) -> bool {
        self.risk_capital > 0.0 && self.risk_reward_ratio > 0.0
    }
}

/// Partial update applied to [`DailySettings`] by shallow merge.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsPatch {
    pub risk_capital: Option<f64>,
    pub risk_reward_ratio: Option<f64>,
}

impl SettingsPatch {
    /// Merges the patch into existing settings, leaving absent fields alone.
    pub fn apply(self, settings: &mut DailySettings) {
        if let Some(v) = self.risk_capital {
            settings.risk_capital = v;
        }
        if let Some(v) = self.risk_reward_ratio {
            settings.risk_reward_ratio = v;
        }
    }
}
