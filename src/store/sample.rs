use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use crate::initiative::Initiative;
use crate::transfer::validate_import_data;

#[allow(clippy::too_many_arguments)]
fn sample_record(
    title: &str,
    reach: Value,
    impact: Value,
    confidence: Value,
    effort: Value,
    created_ago: Duration,
    updated_ago: Duration,
    now: DateTime<Utc>,
) -> Value {
    json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "title": title,
        "reach": reach,
        "impactDrivers": impact,
        "confidenceDrivers": confidence,
        "effort": effort,
        "createdAt": (now - created_ago).to_rfc3339(),
        "updatedAt": (now - updated_ago).to_rfc3339(),
    })
}

/// Example initiatives for a first run.
///
/// The reach drivers are written in the legacy (mode-less) shape and go
/// through the same migration as an imported file.
pub fn sample_entries(now: DateTime<Utc>) -> Result<Vec<Initiative>> {
    let records = vec![
        sample_record(
            "Mobile App Push Notifications",
            json!({
                "eligibleToday": 45000,
                "monthlyGrowth": 1000,
                "adoptionRatePercentage": 80,
                "context": "Based on current mobile app user base analysis with 1k new users monthly"
            }),
            json!({
                "userValue": 4, "businessValue": 5, "strategicFit": 4,
                "context": "Push notifications will increase user engagement and retention significantly"
            }),
            json!({
                "dataQuality": 85, "precedentSimilarity": 90, "deliveryConfidence": 75,
                "context": "Similar implementation done for web platform with great success"
            }),
            json!({
                "frontend": 80, "backend": 120, "design": 40, "pm": 20,
                "context": "Mobile push infrastructure already exists, mainly UI work needed"
            }),
            Duration::days(7),
            Duration::days(2),
            now,
        ),
        sample_record(
            "Advanced Search Filters",
            json!({
                "eligibleToday": 4500,
                "monthlyGrowth": 100,
                "adoptionRatePercentage": 60,
                "context": "Power users who frequently search and filter content, growing slowly"
            }),
            json!({
                "userValue": 3, "businessValue": 3, "strategicFit": 5,
                "context": "Addresses top user request from support tickets and surveys"
            }),
            json!({
                "dataQuality": 70, "precedentSimilarity": 80, "deliveryConfidence": 85,
                "context": "Search infrastructure is solid, but complex UI patterns needed"
            }),
            json!({
                "frontend": 160, "backend": 200, "design": 80, "pm": 40,
                "context": "Complex filter logic and UI states require careful planning"
            }),
            Duration::days(5),
            Duration::days(1),
            now,
        ),
        sample_record(
            "Dark Mode Theme",
            json!({
                "eligibleToday": 2200,
                "monthlyGrowth": 50,
                "adoptionRatePercentage": 40,
                "context": "Users who prefer dark interfaces, mostly power users with modest growth"
            }),
            json!({
                "userValue": 2, "businessValue": 2, "strategicFit": 3,
                "context": "Nice-to-have feature that improves user experience for some segments"
            }),
            json!({
                "dataQuality": 95, "precedentSimilarity": 95, "deliveryConfidence": 90,
                "context": "Well-established pattern with clear implementation path"
            }),
            json!({
                "frontend": 120, "backend": 40, "design": 160, "pm": 20,
                "context": "Design system needs comprehensive theming, minimal backend changes"
            }),
            Duration::days(3),
            Duration::hours(6),
            now,
        ),
        sample_record(
            "AI-Powered Recommendations",
            json!({
                "eligibleToday": 85000,
                "monthlyGrowth": 2500,
                "adoptionRatePercentage": 30,
                "context": "All active users with strong user acquisition growth, adoption depends on ML quality"
            }),
            json!({
                "userValue": 5, "businessValue": 5, "strategicFit": 5,
                "context": "Game-changing feature that could significantly increase engagement and revenue"
            }),
            json!({
                "dataQuality": 60, "precedentSimilarity": 40, "deliveryConfidence": 50,
                "context": "High-risk project with uncertain ML performance and complex data pipeline requirements"
            }),
            json!({
                "frontend": 200, "backend": 400, "design": 80, "pm": 80,
                "context": "Requires ML infrastructure, data pipeline, and extensive testing"
            }),
            Duration::days(1),
            Duration::hours(2),
            now,
        ),
    ];

    let report = validate_import_data(&json!({ "entries": records }), now)?;
    Ok(report.data.entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initiative::ReachInput;
    use crate::scoring::rank;

    #[test]
    fn test_sample_entries_are_migrated() {
        let entries = sample_entries(Utc::now()).unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries
            .iter()
            .all(|e| matches!(e.reach, ReachInput::Acquire(_))));
        // Legacy context is kept, not replaced
        assert!(entries[0]
            .reach
            .context()
            .unwrap()
            .starts_with("Based on current mobile app"));
    }

    #[test]
    fn test_sample_ranking() {
        let entries = sample_entries(Utc::now()).unwrap();
        let ranked = rank(&entries);
        // Push: 9600 reach × 2.64 × 83.3% / 6.5 weeks ≈ 3249
        assert_eq!(ranked[0].initiative.title, "Mobile App Push Notifications");
        assert_eq!(ranked[0].scores.reach, 9600.0);
        assert_eq!(ranked[3].initiative.title, "Dark Mode Theme");
    }

    #[test]
    fn test_sample_timestamps_ordered() {
        let entries = sample_entries(Utc::now()).unwrap();
        assert!(entries.iter().all(|e| e.created_at <= e.updated_at));
    }
}
