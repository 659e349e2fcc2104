use crate::initiative::{Initiative, ReachInput};

/// Check an initiative's drivers against their expected domains.
/// Returns all problems at once (not just the first).
///
/// Scoring never depends on this: out-of-range drivers still produce a score.
pub fn validate_initiative(initiative: &Initiative) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if initiative.title.trim().is_empty() {
        errors.push("title: must not be empty".to_string());
    }

    match &initiative.reach {
        ReachInput::Optimise(r) => {
            check_non_negative(&mut errors, "reach.eligibleToday", r.eligible_today);
            check_non_negative(&mut errors, "reach.monthlyGrowth", r.monthly_growth);
            check_percentage(
                &mut errors,
                "reach.currentAdoptionPercentage",
                r.current_adoption_percentage,
            );
            check_percentage(
                &mut errors,
                "reach.adoptionRatePercentage",
                r.adoption_rate_percentage,
            );
        }
        ReachInput::Acquire(r) => {
            check_non_negative(&mut errors, "reach.monthlyNewEligible", r.monthly_new_eligible);
            check_percentage(
                &mut errors,
                "reach.adoptionRatePercentage",
                r.adoption_rate_percentage,
            );
        }
    }

    let impact = &initiative.impact_drivers;
    for (name, value) in [
        ("impactDrivers.userValue", impact.user_value),
        ("impactDrivers.businessValue", impact.business_value),
        ("impactDrivers.strategicFit", impact.strategic_fit),
    ] {
        if !value.is_finite() || !(1.0..=5.0).contains(&value) {
            errors.push(format!("{}: {} is outside 1-5", name, value));
        }
    }

    let confidence = &initiative.confidence_drivers;
    check_percentage(&mut errors, "confidenceDrivers.dataQuality", confidence.data_quality);
    check_percentage(
        &mut errors,
        "confidenceDrivers.precedentSimilarity",
        confidence.precedent_similarity,
    );
    check_percentage(
        &mut errors,
        "confidenceDrivers.deliveryConfidence",
        confidence.delivery_confidence,
    );

    let effort = &initiative.effort;
    check_non_negative(&mut errors, "effort.frontend", effort.frontend);
    check_non_negative(&mut errors, "effort.backend", effort.backend);
    check_non_negative(&mut errors, "effort.design", effort.design);
    check_non_negative(&mut errors, "effort.pm", effort.pm);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_non_negative(errors: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(format!("{}: must be a non-negative number, got {}", name, value));
    }
}

fn check_percentage(errors: &mut Vec<String>, name: &str, value: f64) {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        errors.push(format!("{}: {} is outside 0-100", name, value));
    }
}
