//! NegRR plan metrics.
//!
//! NegRR plans store raw trade levels and are re-priced on every render:
//! the planned figures from `plan_entry_price`, and — when a fill has been
//! recorded — the same four metrics again from `actual_entry_price`,
//! shown alongside the planned ones without replacing them.

use crate::models::{NegRrPlan, Position};

/// Monetary risk/reward metrics for one entry price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegRrMetrics {
    /// Loss magnitude if the stop is hit (always non-negative).
    pub required_risk: f64,
    /// Signed P&L if the profit level is hit.
    pub target_profit: f64,
    /// Target distance over risk distance.
    pub r_multiple: f64,
}

/// Signed P&L of a move from `entry` to `exit` for a position.
pub fn pnl(position: Position, point_value: f64, contracts: f64, entry: f64, exit: f64) -> f64 {
    let diff = if position.is_long() {
        exit - entry
    } else {
        entry - exit
    };
    diff * point_value * contracts
}

fn metrics_for(plan: &NegRrPlan, entry: f64) -> Option<NegRrMetrics> {
    if !entry.is_finite() {
        return None;
    }
    let risk_distance = (entry - plan.stop_price).abs();
    if risk_distance == 0.0 {
        return None;
    }
    let contracts = if plan.contracts.is_finite() {
        plan.contracts
    } else {
        0.0
    };
    Some(NegRrMetrics {
        required_risk: pnl(plan.position, plan.point_value, contracts, entry, plan.stop_price)
            .abs(),
        target_profit: pnl(plan.position, plan.point_value, contracts, entry, plan.profit_price),
        r_multiple: (plan.profit_price - entry).abs() / risk_distance,
    })
}

/// Metrics at the planned entry price.
pub fn planned_metrics(plan: &NegRrPlan) -> Option<NegRrMetrics> {
    metrics_for(plan, plan.plan_entry_price)
}

/// Metrics at the recorded actual entry, when one exists.
pub fn actual_metrics(plan: &NegRrPlan) -> Option<NegRrMetrics> {
    plan.actual_entry_price.and_then(|entry| metrics_for(plan, entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn long_plan() -> NegRrPlan {
        NegRrPlan {
            id: "p1".to_string(),
            created_at: Utc::now(),
            instrument_id: "i1".to_string(),
            instrument_symbol: "NQ".to_string(),
            point_value: 20.0,
            position: Position::Long,
            stop_price: 95.0,
            profit_price: 115.0,
            plan_entry_price: 100.0,
            actual_entry_price: None,
            contracts: 2.0,
        }
    }

    #[test]
    fn long_planned_metrics() {
        let m = planned_metrics(&long_plan()).unwrap();
        assert_eq!(m.required_risk, 200.0);
        assert_eq!(m.target_profit, 600.0);
        assert!((m.r_multiple - 3.0).abs() < 1e-12);
    }

    #[test]
    fn short_planned_metrics() {
        let plan = NegRrPlan {
            position: Position::Short,
            stop_price: 105.0,
            profit_price: 85.0,
            ..long_plan()
        };
        let m = planned_metrics(&plan).unwrap();
        // Short risk: entry 100, stop 105 — five points against.
        assert_eq!(m.required_risk, 200.0);
        // Short profit: entry 100, target 85 — fifteen points in favor.
        assert_eq!(m.target_profit, 600.0);
        assert!((m.r_multiple - 3.0).abs() < 1e-12);
    }

    #[test]
    fn losing_target_yields_negative_profit() {
        let plan = NegRrPlan {
            // "Profit" level below a long entry: negative reward plan.
            profit_price: 98.0,
            ..long_plan()
        };
        let m = planned_metrics(&plan).unwrap();
        assert_eq!(m.target_profit, -80.0);
        assert!(m.required_risk > 0.0);
    }

    #[test]
    fn actual_entry_recomputes_without_replacing_plan() {
        let plan = NegRrPlan {
            actual_entry_price: Some(101.0),
            ..long_plan()
        };
        let planned = planned_metrics(&plan).unwrap();
        let actual = actual_metrics(&plan).unwrap();
        assert_eq!(planned.required_risk, 200.0);
        assert_eq!(actual.required_risk, 240.0);
        assert_eq!(actual.target_profit, 560.0);
        assert!((actual.r_multiple - 14.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn no_actual_entry_no_actual_metrics() {
        assert!(actual_metrics(&long_plan()).is_none());
    }

    #[test]
    fn entry_at_stop_gives_no_result() {
        let plan = NegRrPlan {
            plan_entry_price: 95.0,
            ..long_plan()
        };
        assert!(planned_metrics(&plan).is_none());
    }

    #[test]
    fn zero_contracts_zero_money_metrics() {
        let plan = NegRrPlan {
            contracts: 0.0,
            ..long_plan()
        };
        let m = planned_metrics(&plan).unwrap();
        assert_eq!(m.required_risk, 0.0);
        assert_eq!(m.target_profit, 0.0);
        // The R-multiple is a pure price ratio, independent of size.
        assert!((m.r_multiple - 3.0).abs() < 1e-12);
    }
}
