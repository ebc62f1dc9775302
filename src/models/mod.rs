//! Shared data models for instruments, plans, and daily settings.
//!
//! Serialized field names (camelCase) are the persisted storage schema;
//! each owning repository writes its collection as one JSON blob.

pub mod instrument;
pub mod plan;
pub mod settings;

pub use instrument::{Instrument, InstrumentSpec};
pub use plan::{
    NegRrDraft, NegRrPatch, NegRrPlan, Plan, PlanCalculations, PlanDraft, PlanRecord, Position,
};
pub use settings::{DailySettings, SettingsPatch};
