use std::cmp::Ordering;

use super::engine::{score, ScoreResult, HOURS_PER_WEEK};
use crate::initiative::Initiative;

/// Average weeks per month used when converting portfolio effort
pub const WEEKS_PER_MONTH: f64 = 4.33;

/// An initiative with its derived scores, as shown in the ranking
#[derive(Debug, Clone)]
pub struct RankedInitiative<'a> {
    pub initiative: &'a Initiative,
    pub scores: ScoreResult,
}

/// Score every initiative once and sort by RICE score, highest first.
///
/// The sort is stable: equal scores keep their stored order.
pub fn rank(entries: &[Initiative]) -> Vec<RankedInitiative<'_>> {
    let mut ranked: Vec<_> = entries
        .iter()
        .map(|initiative| RankedInitiative {
            initiative,
            scores: score(
                &initiative.reach,
                &initiative.impact_drivers,
                &initiative.confidence_drivers,
                &initiative.effort,
            ),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.scores
            .rice_score
            .partial_cmp(&a.scores.rice_score)
            .unwrap_or(Ordering::Equal)
    });

    ranked
}

/// 12-month portfolio summary across all ranked initiatives
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioTotals {
    pub reach: f64,
    pub effort_hours: f64,
    pub effort_months: f64,
    /// Annual recurring revenue uplift: revenue rate × 12 × total reach
    pub arr_uplift: f64,
}

impl PortfolioTotals {
    /// `revenue_rate` is the monthly revenue per user (ARPU).
    pub fn from_ranked(ranked: &[RankedInitiative<'_>], revenue_rate: f64) -> Self {
        let reach: f64 = ranked.iter().map(|r| r.scores.reach).sum();
        let effort_hours: f64 = ranked.iter().map(|r| r.scores.effort_hours).sum();

        Self {
            reach,
            effort_hours,
            effort_months: effort_hours / (HOURS_PER_WEEK * WEEKS_PER_MONTH),
            arr_uplift: revenue_rate * 12.0 * reach,
        }
    }
}
