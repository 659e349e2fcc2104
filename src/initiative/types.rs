use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reach drivers. The `mode` tag selects which formula applies.
///
/// Serialized form:
/// ```json
/// { "mode": "acquire", "monthlyNewEligible": 500, "adoptionRatePercentage": 30 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ReachInput {
    /// Adoption uplift within an already-addressable user base
    Optimise(OptimiseReach),
    /// Growth from a new acquisition channel
    Acquire(AcquireReach),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimiseReach {
    #[serde(default)]
    pub eligible_today: f64,
    #[serde(default)]
    pub monthly_growth: f64, // new eligible users per month
    #[serde(default)]
    pub current_adoption_percentage: f64,
    #[serde(default)]
    pub adoption_rate_percentage: f64, // target adoption after the initiative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireReach {
    /// Monthly new users in the serviceable obtainable market (SOM), not TAM or SAM
    #[serde(default)]
    pub monthly_new_eligible: f64,
    #[serde(default)]
    pub adoption_rate_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ReachInput {
    /// An optimise-mode input with every driver at zero. Computes to zero reach.
    pub fn zeroed(context: Option<String>) -> Self {
        ReachInput::Optimise(OptimiseReach {
            context,
            ..OptimiseReach::default()
        })
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            ReachInput::Optimise(_) => "optimise",
            ReachInput::Acquire(_) => "acquire",
        }
    }

    pub fn context(&self) -> Option<&str> {
        match self {
            ReachInput::Optimise(r) => r.context.as_deref(),
            ReachInput::Acquire(r) => r.context.as_deref(),
        }
    }
}

impl Default for ReachInput {
    fn default() -> Self {
        ReachInput::zeroed(None)
    }
}

/// Impact drivers, each expected in 1-5
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactInput {
    #[serde(default)]
    pub user_value: f64,
    #[serde(default)]
    pub business_value: f64,
    #[serde(default)]
    pub strategic_fit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Default for ImpactInput {
    fn default() -> Self {
        Self {
            user_value: 3.0,
            business_value: 3.0,
            strategic_fit: 3.0,
            context: None,
        }
    }
}

/// Confidence drivers, each a percentage in 0-100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInput {
    #[serde(default)]
    pub data_quality: f64,
    #[serde(default)]
    pub precedent_similarity: f64,
    #[serde(default)]
    pub delivery_confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Default for ConfidenceInput {
    fn default() -> Self {
        Self {
            data_quality: 50.0,
            precedent_similarity: 50.0,
            delivery_confidence: 50.0,
            context: None,
        }
    }
}

/// Effort per discipline, in hours (40h = 1 person-week)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffortInput {
    #[serde(default)]
    pub frontend: f64,
    #[serde(default)]
    pub backend: f64,
    #[serde(default)]
    pub design: f64,
    #[serde(default)]
    pub pm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A stored initiative: one set of drivers plus identity and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: String, // uuid v4
    pub title: String,
    pub reach: ReachInput,
    pub impact_drivers: ImpactInput,
    pub confidence_drivers: ConfidenceInput,
    pub effort: EffortInput,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Initiative {
    /// Create a new initiative with a fresh id and both timestamps set to now
    pub fn new(
        title: impl Into<String>,
        reach: ReachInput,
        impact_drivers: ImpactInput,
        confidence_drivers: ConfidenceInput,
        effort: EffortInput,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            reach,
            impact_drivers,
            confidence_drivers,
            effort,
            created_at: now,
            updated_at: now,
        }
    }

    /// Short id prefix for display ("3f2a9c1e")
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}
