use serde_json::{Map, Value};

use crate::initiative::{AcquireReach, OptimiseReach, ReachInput};

const LEGACY_CONTEXT: &str = "Converted from legacy format";

/// How a stored reach object relates to the current tagged shape
#[derive(Debug, Clone, PartialEq)]
pub enum ReachShape {
    /// `mode` is "optimise" or "acquire"
    Current,
    /// Has `eligibleToday` and `monthlyGrowth` but no `mode`
    Legacy,
    /// No `mode` and not the legacy shape; read as optimise
    MissingMode,
    /// `mode` is set to something unrecognized
    UnknownMode(String),
}

fn has_mode(obj: &Map<String, Value>) -> bool {
    match obj.get("mode") {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

pub fn classify_reach(value: &Value) -> ReachShape {
    let Some(obj) = value.as_object() else {
        return ReachShape::MissingMode;
    };

    if !has_mode(obj) {
        if obj.contains_key("eligibleToday") && obj.contains_key("monthlyGrowth") {
            return ReachShape::Legacy;
        }
        return ReachShape::MissingMode;
    }

    match obj.get("mode") {
        Some(Value::String(mode)) if mode == "optimise" || mode == "acquire" => ReachShape::Current,
        Some(Value::String(mode)) => ReachShape::UnknownMode(mode.clone()),
        Some(other) => ReachShape::UnknownMode(other.to_string()),
        None => ReachShape::MissingMode,
    }
}

/// Read a numeric field, treating missing or non-numeric values as 0
pub(crate) fn number(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

pub(crate) fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Rewrite any stored reach object into the current tagged shape.
///
/// - Legacy records (no `mode`, with `eligibleToday`/`monthlyGrowth`) become
///   acquire inputs with `monthlyNewEligible = monthlyGrowth`.
/// - Records without a mode are read as optimise.
/// - Records with an unrecognized mode become a zeroed optimise input, so
///   they score zero reach; only `context` survives.
pub fn migrate_reach(value: &Value) -> ReachInput {
    match classify_reach(value) {
        ReachShape::Legacy => ReachInput::Acquire(AcquireReach {
            monthly_new_eligible: number(value, "monthlyGrowth"),
            adoption_rate_percentage: number(value, "adoptionRatePercentage"),
            context: text(value, "context").or_else(|| Some(LEGACY_CONTEXT.to_string())),
        }),
        ReachShape::UnknownMode(_) => ReachInput::zeroed(text(value, "context")),
        ReachShape::Current if value.get("mode").and_then(Value::as_str) == Some("acquire") => {
            ReachInput::Acquire(AcquireReach {
                monthly_new_eligible: number(value, "monthlyNewEligible"),
                adoption_rate_percentage: number(value, "adoptionRatePercentage"),
                context: text(value, "context"),
            })
        }
        ReachShape::Current | ReachShape::MissingMode => ReachInput::Optimise(OptimiseReach {
            eligible_today: number(value, "eligibleToday"),
            monthly_growth: number(value, "monthlyGrowth"),
            current_adoption_percentage: number(value, "currentAdoptionPercentage"),
            adoption_rate_percentage: number(value, "adoptionRatePercentage"),
            context: text(value, "context"),
        }),
    }
}
