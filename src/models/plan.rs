//! Stored trading plans.
//!
//! Two plan families share one persisted collection, distinguished by the
//! `type` tag: price-zone plans carry a frozen [`PlanCalculations`]
//! snapshot, NegRR plans carry the raw trade levels and are re-priced live
//! by [`crate::sizing::negrr`]. Apart from the two explicitly editable
//! NegRR fields, a stored plan never changes after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Long,
    Short,
}

impl Position {
    pub fn is_long(self) -> bool {
        matches!(self, Position::Long)
    }
}

/// Derived sizing and price levels frozen into a plan at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanCalculations {
    pub contracts: f64,
    pub risk_in_points: f64,
    pub target_profit_points: f64,
    pub long_entry: f64,
    pub long_stop: f64,
    pub target_long: f64,
    pub short_entry: f64,
    pub short_stop: f64,
    pub target_short: f64,
}

/// A generated zone/fixed-stop trading plan.
///
/// `risk_capital` and `risk_reward_ratio` are snapshots of the daily
/// settings at creation time; later settings changes never alter them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub instrument_id: String,
    pub instrument_symbol: String,
    pub risk_capital: f64,
    pub risk_reward_ratio: f64,
    pub si_zone_top: f64,
    pub si_zone_bottom: f64,
    pub calculations: PlanCalculations,
}

/// A NegRR plan tracking planned and actual entries side by side.
///
/// `contracts` and `actual_entry_price` remain editable after creation;
/// everything else is a snapshot. `point_value` is copied from the
/// instrument so the plan survives instrument deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegRrPlan {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub instrument_id: String,
    pub instrument_symbol: String,
    pub point_value: f64,
    pub position: Position,
    pub stop_price: f64,
    pub profit_price: f64,
    pub plan_entry_price: f64,
    pub actual_entry_price: Option<f64>,
    pub contracts: f64,
}

/// One entry of the persisted plan collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlanRecord {
    #[serde(rename = "plan")]
    Plan(Plan),
    #[serde(rename = "negrr")]
    NegRr(NegRrPlan),
}

impl PlanRecord {
    pub fn id(&self) -> &str {
        match self {
            PlanRecord::Plan(p) => &p.id,
            PlanRecord::NegRr(p) => &p.id,
        }
    }

    pub fn as_negrr(&self) -> Option<&NegRrPlan> {
        match self {
            PlanRecord::NegRr(p) => Some(p),
            PlanRecord::Plan(_) => None,
        }
    }

    pub fn as_plan(&self) -> Option<&Plan> {
        match self {
            PlanRecord::Plan(p) => Some(p),
            PlanRecord::NegRr(_) => None,
        }
    }
}

/// Input for [`crate::plans::PlanBook::add_plan`]; the repository assigns
/// id and creation timestamp.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub instrument_id: String,
    pub instrument_symbol: String,
    pub risk_capital: f64,
    pub risk_reward_ratio: f64,
    pub si_zone_top: f64,
    pub si_zone_bottom: f64,
    pub calculations: PlanCalculations,
}

/// Input for [`crate::plans::PlanBook::add_negrr_plan`].
#[derive(Debug, Clone)]
pub struct NegRrDraft {
    pub instrument_id: String,
    pub instrument_symbol: String,
    pub point_value: f64,
    pub position: Position,
    pub stop_price: f64,
    pub profit_price: f64,
    pub plan_entry_price: f64,
    pub actual_entry_price: Option<f64>,
}

/// Edit applied to the two mutable NegRR fields.
///
/// `actual_entry_price: Some(None)` clears a previously recorded fill.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegRrPatch {
    pub contracts: Option<f64>,
    pub actual_entry_price: Option<Option<f64>>,
}

impl NegRrPatch {
    pub(crate) fn apply(self, plan: &mut NegRrPlan) {
        if let Some(contracts) = self.contracts {
            plan.contracts = contracts;
        }
        if let Some(actual) = self.actual_entry_price {
            plan.actual_entry_price = actual;
        }
    }
}
