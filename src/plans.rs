//! Trading plan repository.
//!
//! Holds the generated plan collection (newest first) and the daily risk
//! settings. Plans snapshot the settings in force at creation time, so a
//! later settings change never rewrites an existing plan.

use chrono::Utc;
use tracing::warn;

use crate::models::{
    DailySettings, NegRrDraft, NegRrPatch, NegRrPlan, Plan, PlanDraft, PlanRecord, SettingsPatch,
};
use crate::storage::{BlobStore, keys};

/// New NegRR plans start at one contract; the user edits the count on the
/// card afterwards.
const DEFAULT_NEGRR_CONTRACTS: f64 = 1.0;

/// Plan collection and daily settings with injected persistence.
pub struct PlanBook {
    store: Box<dyn BlobStore>,
    plans: Vec<PlanRecord>,
    settings: DailySettings,
}

impl PlanBook {
    /// Loads plans and settings from the store, tolerating missing or
    /// corrupt blobs.
    pub fn load(store: Box<dyn BlobStore>) -> Self {
        let plans = match store.get(keys::TRADING_PLANS) {
            Some(blob) => match serde_json::from_str(&blob) {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "corrupt plan blob, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        let settings = match store.get(keys::DAILY_SETTINGS) {
            Some(blob) => match serde_json::from_str(&blob) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "corrupt settings blob, using defaults");
                    DailySettings::default()
                }
            },
            None => DailySettings::default(),
        };
        Self {
            store,
            plans,
            settings,
        }
    }

    /// All plans, newest first.
    pub fn list(&self) -> &[PlanRecord] {
        &self.plans
    }

    /// Only the NegRR plans, newest first.
    pub fn negrr_plans(&self) -> impl Iterator<Item = &NegRrPlan> {
        self.plans.iter().filter_map(PlanRecord::as_negrr)
    }

    /// Only the zone/fixed-stop plans, newest first.
    pub fn sized_plans(&self) -> impl Iterator<Item = &Plan> {
        self.plans.iter().filter_map(PlanRecord::as_plan)
    }

    /// Stores a zone/fixed-stop plan, assigning id and creation timestamp.
    pub fn add_plan(&mut self, draft: PlanDraft) -> &PlanRecord {
        let record = PlanRecord::Plan(Plan {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            instrument_id: draft.instrument_id,
            instrument_symbol: draft.instrument_symbol,
            risk_capital: draft.risk_capital,
            risk_reward_ratio: draft.risk_reward_ratio,
            si_zone_top: draft.si_zone_top,
            si_zone_bottom: draft.si_zone_bottom,
            calculations: draft.calculations,
        });
        self.plans.insert(0, record);
        self.persist_plans();
        &self.plans[0]
    }

    /// Stores a NegRR plan, assigning id, creation timestamp, and the
    /// initial contract count.
    pub fn add_negrr_plan(&mut self, draft: NegRrDraft) -> &PlanRecord {
        let record = PlanRecord::NegRr(NegRrPlan {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            instrument_id: draft.instrument_id,
            instrument_symbol: draft.instrument_symbol,
            point_value: draft.point_value,
            position: draft.position,
            stop_price: draft.stop_price,
            profit_price: draft.profit_price,
            plan_entry_price: draft.plan_entry_price,
            actual_entry_price: draft.actual_entry_price,
            contracts: DEFAULT_NEGRR_CONTRACTS,
        });
        self.plans.insert(0, record);
        self.persist_plans();
        &self.plans[0]
    }

    /// Edits the mutable NegRR fields of a stored plan. Returns `false`
    /// when the id is unknown or names a non-NegRR plan (those are
    /// immutable).
    pub fn update_plan(&mut self, id: &str, patch: NegRrPatch) -> bool {
        let Some(record) = self.plans.iter_mut().find(|p| p.id() == id) else {
            return false;
        };
        match record {
            PlanRecord::NegRr(plan) => {
                patch.apply(plan);
                self.persist_plans();
                true
            }
            PlanRecord::Plan(_) => false,
        }
    }

    /// Removes a plan by id.
    pub fn delete_plan(&mut self, id: &str) -> bool {
        let before = self.plans.len();
        self.plans.retain(|p| p.id() != id);
        if self.plans.len() == before {
            return false;
        }
        self.persist_plans();
        true
    }

    pub fn settings(&self) -> DailySettings {
        self.settings
    }

    /// Partially merges new values into the daily settings and persists
    /// them as their own blob.
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        patch.apply(&mut self.settings);
        self.persist_settings();
    }

    fn persist_plans(&self) {
        match serde_json::to_string(&self.plans) {
            Ok(blob) => {
                if let Err(e) = self.store.put(keys::TRADING_PLANS, &blob) {
                    warn!(error = %e, "failed to persist plans");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize plans"),
        }
    }

    fn persist_settings(&self) {
        match serde_json::to_string(&self.settings) {
            Ok(blob) => {
                if let Err(e) = self.store.put(keys::DAILY_SETTINGS, &blob) {
                    warn!(error = %e, "failed to persist settings");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize settings"),
        }
    }
}
