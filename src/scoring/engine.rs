use crate::initiative::{ConfidenceInput, EffortInput, ImpactInput, ReachInput};

/// Hours in one person-week. Effort is normalized to this before dividing.
pub const HOURS_PER_WEEK: f64 = 40.0;

/// Months of new sign-ups counted towards reach (12-month horizon)
const REACH_HORIZON_MONTHS: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub reach: f64,
    pub impact: f64,
    pub confidence: f64,
    pub effort_hours: f64,
    pub rice_score: f64,
}

impl ScoreResult {
    pub fn effort_weeks(&self) -> f64 {
        self.effort_hours / HOURS_PER_WEEK
    }
}

/// Round half up to the nearest integer (2.5 -> 3, -2.5 -> -2).
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Number of users helped over the next 12 months.
///
/// Optimise: `(eligibleToday + monthlyGrowth×12) × (target% − current%) / 100`.
/// Negative uplift gives a negative reach; it is not clamped.
///
/// Acquire: `(monthlyNewEligible × 12) × adoption% / 100`.
///
/// Rounding is applied once, to the final product.
pub fn compute_reach(input: &ReachInput) -> f64 {
    match input {
        ReachInput::Optimise(r) => {
            let total_eligible = r.eligible_today + r.monthly_growth * REACH_HORIZON_MONTHS;
            let uplift = r.adoption_rate_percentage - r.current_adoption_percentage;
            round_half_up(total_eligible * uplift / 100.0)
        }
        ReachInput::Acquire(r) => {
            let annual_new_eligible = r.monthly_new_eligible * REACH_HORIZON_MONTHS;
            round_half_up(annual_new_eligible * r.adoption_rate_percentage / 100.0)
        }
    }
}

/// Weighted impact, mapping the 1-5 driver domain onto 0.6-3.0
pub fn compute_impact(input: &ImpactInput) -> f64 {
    let weighted =
        input.user_value * 0.4 + input.business_value * 0.4 + input.strategic_fit * 0.2;
    (weighted / 5.0) * 3.0
}

/// Unweighted mean of the three confidence drivers (0-100)
pub fn compute_confidence(input: &ConfidenceInput) -> f64 {
    (input.data_quality + input.precedent_similarity + input.delivery_confidence) / 3.0
}

pub fn compute_effort_hours(input: &EffortInput) -> f64 {
    input.frontend + input.backend + input.design + input.pm
}

/// `(reach × impact × confidence%) / effort in person-weeks`.
///
/// Zero effort is a sentinel: with positive reach, impact and confidence the
/// result is `f64::INFINITY` ("infinitely favorable"). Callers that display or
/// rank scores must check `effort_hours > 0` first; [`score`] does this.
/// Zero reach gives exactly zero regardless of the other inputs.
pub fn compute_rice_score(reach: f64, impact: f64, confidence: f64, effort_hours: f64) -> f64 {
    if reach == 0.0 {
        return 0.0;
    }
    let effort_weeks = effort_hours / HOURS_PER_WEEK;
    (reach * impact * (confidence / 100.0)) / effort_weeks
}

/// Compute every derived number for one set of drivers.
///
/// Unlike [`compute_rice_score`], a non-positive effort yields a RICE score of
/// zero rather than the infinity sentinel.
pub fn score(
    reach: &ReachInput,
    impact: &ImpactInput,
    confidence: &ConfidenceInput,
    effort: &EffortInput,
) -> ScoreResult {
    let reach = compute_reach(reach);
    let impact = compute_impact(impact);
    let confidence = compute_confidence(confidence);
    let effort_hours = compute_effort_hours(effort);

    let rice_score = if effort_hours > 0.0 {
        compute_rice_score(reach, impact, confidence, effort_hours)
    } else {
        0.0
    };

    ScoreResult {
        reach,
        impact,
        confidence,
        effort_hours,
        rice_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initiative::{AcquireReach, OptimiseReach};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn optimise(eligible: f64, growth: f64, current: f64, target: f64) -> ReachInput {
        ReachInput::Optimise(OptimiseReach {
            eligible_today: eligible,
            monthly_growth: growth,
            current_adoption_percentage: current,
            adoption_rate_percentage: target,
            context: None,
        })
    }

    fn acquire(monthly: f64, adoption: f64) -> ReachInput {
        ReachInput::Acquire(AcquireReach {
            monthly_new_eligible: monthly,
            adoption_rate_percentage: adoption,
            context: None,
        })
    }

    fn impact(user: f64, business: f64, fit: f64) -> ImpactInput {
        ImpactInput {
            user_value: user,
            business_value: business,
            strategic_fit: fit,
            context: None,
        }
    }

    fn effort(frontend: f64, backend: f64, design: f64, pm: f64) -> EffortInput {
        EffortInput {
            frontend,
            backend,
            design,
            pm,
            context: None,
        }
    }

    #[test]
    fn test_optimise_reach_includes_monthly_growth() {
        // (600 + 100×12) × (43 − 17) / 100 = 1800 × 0.26
        assert_eq!(compute_reach(&optimise(600.0, 100.0, 17.0, 43.0)), 468.0);
    }

    #[test]
    fn test_optimise_reach_without_growth() {
        assert_eq!(compute_reach(&optimise(10_000.0, 0.0, 15.0, 40.0)), 2500.0);
    }

    #[test]
    fn test_optimise_reach_zero_uplift() {
        assert_eq!(compute_reach(&optimise(5000.0, 200.0, 30.0, 30.0)), 0.0);
    }

    #[test]
    fn test_optimise_reach_negative_uplift_not_clamped() {
        // (5000 + 1200) × −20%
        assert_eq!(compute_reach(&optimise(5000.0, 100.0, 50.0, 30.0)), -1240.0);
    }

    #[test]
    fn test_optimise_reach_defaults() {
        let reach: ReachInput =
            serde_json::from_str(r#"{"mode":"optimise","adoptionRatePercentage":25}"#).unwrap();
        assert_eq!(compute_reach(&reach), 0.0);
    }

    #[test]
    fn test_acquire_reach() {
        // (500 × 12) × 30%
        assert_eq!(compute_reach(&acquire(500.0, 30.0)), 1800.0);
    }

    #[test]
    fn test_acquire_reach_zero_inputs() {
        assert_eq!(compute_reach(&acquire(0.0, 50.0)), 0.0);
        assert_eq!(compute_reach(&acquire(1000.0, 0.0)), 0.0);
    }

    #[test]
    fn test_acquire_reach_rounds_final_product() {
        // 3996 × 0.3333 = 1331.8668
        assert_eq!(compute_reach(&acquire(333.0, 33.33)), 1332.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_zeroed_reach_is_zero() {
        assert_eq!(compute_reach(&ReachInput::zeroed(None)), 0.0);
    }

    #[test]
    fn test_impact_bounds() {
        assert!(approx(compute_impact(&impact(5.0, 5.0, 5.0)), 3.0));
        assert!(approx(compute_impact(&impact(1.0, 1.0, 1.0)), 0.6));
    }

    #[test]
    fn test_impact_weighting() {
        // 4×0.4 + 5×0.4 + 4×0.2 = 4.4 -> 4.4 / 5 × 3 = 2.64
        assert!(approx(compute_impact(&impact(4.0, 5.0, 4.0)), 2.64));
    }

    #[test]
    fn test_confidence_mean() {
        let input = ConfidenceInput {
            data_quality: 80.0,
            precedent_similarity: 70.0,
            delivery_confidence: 60.0,
            context: None,
        };
        assert_eq!(compute_confidence(&input), 70.0);
    }

    #[test]
    fn test_effort_hours_sum() {
        assert_eq!(compute_effort_hours(&effort(40.0, 80.0, 20.0, 10.0)), 150.0);
        assert_eq!(compute_effort_hours(&effort(0.0, 0.0, 0.0, 0.0)), 0.0);
    }

    #[test]
    fn test_rice_score() {
        // 2500 × 2.5 × 0.75 / 4 weeks
        assert_eq!(compute_rice_score(2500.0, 2.5, 75.0, 160.0), 1171.875);
    }

    #[test]
    fn test_rice_score_zero_effort_is_infinite() {
        let result = compute_rice_score(100.0, 2.0, 50.0, 0.0);
        assert!(result.is_infinite());
        assert!(result.is_sign_positive());
    }

    #[test]
    fn test_rice_score_zero_reach() {
        assert_eq!(compute_rice_score(0.0, 3.0, 100.0, 40.0), 0.0);
        assert_eq!(compute_rice_score(0.0, 0.6, 1.0, 10_000.0), 0.0);
    }

    #[test]
    fn test_compute_functions_are_idempotent() {
        let reach = optimise(600.0, 100.0, 17.0, 43.0);
        let drivers = impact(2.0, 4.0, 3.0);
        assert_eq!(compute_reach(&reach), compute_reach(&reach));
        assert_eq!(compute_impact(&drivers), compute_impact(&drivers));
        let conf = ConfidenceInput {
            data_quality: 80.0,
            precedent_similarity: 70.0,
            delivery_confidence: 60.0,
            context: None,
        };
        assert_eq!(compute_confidence(&conf), compute_confidence(&conf));
        let hours = effort(40.0, 80.0, 20.0, 10.0);
        assert_eq!(compute_effort_hours(&hours), compute_effort_hours(&hours));
        assert_eq!(
            compute_rice_score(468.0, 2.0, 70.0, 150.0),
            compute_rice_score(468.0, 2.0, 70.0, 150.0)
        );
    }

    #[test]
    fn test_rice_score_zero_reach_zero_effort() {
        assert_eq!(compute_rice_score(0.0, 2.0, 50.0, 0.0), 0.0);
        assert_eq!(compute_rice_score(0.0, 3.0, 100.0, 160.0), 0.0);
    }

    #[test]
    fn test_score_substitutes_zero_for_zero_effort() {
        let result = score(
            &acquire(500.0, 30.0),
            &impact(5.0, 5.0, 5.0),
            &ConfidenceInput::default(),
            &effort(0.0, 0.0, 0.0, 0.0),
        );
        assert_eq!(result.reach, 1800.0);
        assert_eq!(result.effort_hours, 0.0);
        assert_eq!(result.rice_score, 0.0);
    }

    #[test]
    fn test_score_full_flow() {
        let result = score(
            &acquire(500.0, 30.0),
            &impact(5.0, 5.0, 5.0),
            &ConfidenceInput {
                data_quality: 80.0,
                precedent_similarity: 70.0,
                delivery_confidence: 60.0,
                context: None,
            },
            &effort(40.0, 80.0, 20.0, 20.0),
        );
        // 1800 × 3 × 0.7 / 4 weeks = 945
        assert!(approx(result.rice_score, 945.0));
        assert_eq!(result.effort_weeks(), 4.0);
    }
}
