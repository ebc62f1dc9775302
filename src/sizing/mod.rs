//! Position-sizing calculators.
//!
//! All calculators are pure and side-effect free. They return `None`
//! ("no result") until every input is valid — never zero contracts, never
//! an error — so a host can keep re-evaluating as the user types. The
//! shared core: `risk_per_contract = risk_in_points * point_value`,
//! `max_contracts = risk_capital / risk_per_contract`.

pub mod negrr;

use crate::models::{DailySettings, Instrument, PlanCalculations, PlanDraft};

/// Core sizing output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeResult {
    pub risk_in_points: f64,
    pub risk_per_contract: f64,
    pub max_contracts: f64,
}

/// Zone sizing carries the measured band height alongside the core result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneSize {
    pub zone_height: f64,
    pub size: SizeResult,
}

/// Applies the core formula after validating every operand.
fn size_for(risk_capital: f64, risk_in_points: f64, point_value: f64) -> Option<SizeResult> {
    if !risk_capital.is_finite() || risk_capital <= 0.0 {
        return None;
    }
    if !risk_in_points.is_finite() || risk_in_points <= 0.0 {
        return None;
    }
    if !point_value.is_finite() || point_value <= 0.0 {
        return None;
    }
    let risk_per_contract = risk_in_points * point_value;
    Some(SizeResult {
        risk_in_points,
        risk_per_contract,
        max_contracts: risk_capital / risk_per_contract,
    })
}

/// Fixed-stop sizing: risk in points is the user's stop distance.
pub fn fixed_stop(
    instrument: &Instrument,
    risk_capital: f64,
    stop_loss_points: f64,
) -> Option<SizeResult> {
    size_for(risk_capital, stop_loss_points, instrument.point_value)
}

/// Zone-based sizing: risk in points is the zone height scaled by a
/// multiplier. Requires `zone_top > zone_bottom`.
pub fn zone(
    instrument: &Instrument,
    risk_capital: f64,
    zone_top: f64,
    zone_bottom: f64,
    risk_multiplier: f64,
) -> Option<ZoneSize> {
    if !zone_top.is_finite() || !zone_bottom.is_finite() || !risk_multiplier.is_finite() {
        return None;
    }
    if zone_top <= zone_bottom {
        return None;
    }
    let zone_height = zone_top - zone_bottom;
    let risk_in_points = zone_height * risk_multiplier;
    size_for(risk_capital, risk_in_points, instrument.point_value)
        .map(|size| ZoneSize { zone_height, size })
}

/// Derives the full long/short price legs around a single entry price.
///
/// `reward_multiple` falls back to the global daily reward ratio when not
/// given per plan.
pub fn entry_plan(
    size: SizeResult,
    entry_price: f64,
    reward_multiple: Option<f64>,
    settings: &DailySettings,
) -> Option<PlanCalculations> {
    let reward = reward_multiple.unwrap_or(settings.risk_reward_ratio);
    if !entry_price.is_finite() || !reward.is_finite() || reward <= 0.0 {
        return None;
    }
    let risk = size.risk_in_points;
    let target_profit_points = risk * reward;
    Some(PlanCalculations {
        contracts: size.max_contracts,
        risk_in_points: risk,
        target_profit_points,
        long_entry: entry_price,
        long_stop: entry_price - risk,
        target_long: entry_price + target_profit_points,
        short_entry: entry_price,
        short_stop: entry_price + risk,
        target_short: entry_price - target_profit_points,
    })
}

/// Fixed-stop plan: sizing plus entry legs. Carries no reference zone.
pub fn fixed_stop_plan(
    instrument: &Instrument,
    settings: &DailySettings,
    stop_loss_points: f64,
    entry_price: f64,
    reward_multiple: Option<f64>,
) -> Option<PlanDraft> {
    let size = fixed_stop(instrument, settings.risk_capital, stop_loss_points)?;
    let reward = reward_multiple.unwrap_or(settings.risk_reward_ratio);
    let calculations = entry_plan(size, entry_price, reward_multiple, settings)?;
    Some(PlanDraft {
        instrument_id: instrument.id.clone(),
        instrument_symbol: instrument.symbol.clone(),
        risk_capital: settings.risk_capital,
        risk_reward_ratio: reward,
        si_zone_top: 0.0,
        si_zone_bottom: 0.0,
        calculations,
    })
}

/// Zone plan: zone sizing plus entry legs, keeping the zone for reference.
pub fn zone_entry_plan(
    instrument: &Instrument,
    settings: &DailySettings,
    zone_top: f64,
    zone_bottom: f64,
    risk_multiplier: f64,
    entry_price: f64,
    reward_multiple: Option<f64>,
) -> Option<PlanDraft> {
    let sized = zone(
        instrument,
        settings.risk_capital,
        zone_top,
        zone_bottom,
        risk_multiplier,
    )?;
    let reward = reward_multiple.unwrap_or(settings.risk_reward_ratio);
    let calculations = entry_plan(sized.size, entry_price, reward_multiple, settings)?;
    Some(PlanDraft {
        instrument_id: instrument.id.clone(),
        instrument_symbol: instrument.symbol.clone(),
        risk_capital: settings.risk_capital,
        risk_reward_ratio: reward,
        si_zone_top: zone_top,
        si_zone_bottom: zone_bottom,
        calculations,
    })
}

/// Symmetric zone-boundary plan, the dashboard default.
///
/// Entries sit one tick outside the zone on each side: the long triggers
/// above the top, the short below the bottom, and each side's stop is the
/// opposite trigger. Risk is the full distance between the two triggers.
pub fn symmetric_zone_plan(
    instrument: &Instrument,
    settings: &DailySettings,
    zone_top: f64,
    zone_bottom: f64,
) -> Option<PlanDraft> {
    if !settings.is_valid() {
        return None;
    }
    if !zone_top.is_finite() || !zone_bottom.is_finite() {
        return None;
    }
    let tick = instrument.tick_size;
    if !tick.is_finite() || tick <= 0.0 {
        return None;
    }

    let long_entry = zone_top + tick;
    let long_stop = zone_bottom - tick;
    let short_entry = zone_bottom - tick;
    let short_stop = zone_top + tick;
    let risk_in_points = long_entry - long_stop;

    let size = size_for(settings.risk_capital, risk_in_points, instrument.point_value)?;
    let target_profit_points = risk_in_points * settings.risk_reward_ratio;

    Some(PlanDraft {
        instrument_id: instrument.id.clone(),
        instrument_symbol: instrument.symbol.clone(),
        risk_capital: settings.risk_capital,
        risk_reward_ratio: settings.risk_reward_ratio,
        si_zone_top: zone_top,
        si_zone_bottom: zone_bottom,
        calculations: PlanCalculations {
            contracts: size.max_contracts,
            risk_in_points,
            target_profit_points,
            long_entry,
            long_stop,
            target_long: long_entry + target_profit_points,
            short_entry,
            short_stop,
            target_short: short_entry - target_profit_points,
        },
    })
}
