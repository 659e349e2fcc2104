use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::path::Path;

use super::migrate::{classify_reach, migrate_reach, number, text, ReachShape};
use crate::initiative::{ConfidenceInput, EffortInput, ImpactInput, Initiative};

pub const EXPORT_VERSION: &str = "1.0";

/// File format shared by export and import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub entries: Vec<Initiative>,
    pub export_date: String,
    pub version: String,
}

/// Outcome of validating an import file
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub data: ExportData,
    /// Entries dropped for missing id, title, or driver objects
    pub skipped: usize,
    /// Per-entry notes about reach records that were rewritten
    pub warnings: Vec<String>,
}

pub fn export_entries(entries: &[Initiative], now: DateTime<Utc>) -> ExportData {
    ExportData {
        entries: entries.to_vec(),
        export_date: now.to_rfc3339(),
        version: EXPORT_VERSION.to_string(),
    }
}

/// Write export data as pretty JSON, atomically
pub fn write_export(path: &Path, data: &ExportData) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize export")?;

    file.commit()
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    Ok(())
}

/// Read and validate an import file
pub fn read_import(path: &Path) -> Result<ImportReport> {
    let file =
        File::open(path).with_context(|| format!("Failed to open import file {}", path.display()))?;

    let value: Value = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse import file {}: invalid JSON", path.display()))?;

    validate_import_data(&value, Utc::now())
}

fn timestamp(entry: &Value, key: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(fallback)
}

/// Convert one raw entry. Returns None if a required field is missing.
fn parse_entry(entry: &Value, now: DateTime<Utc>) -> Option<Initiative> {
    let id = entry.get("id")?.as_str()?;
    let title = entry.get("title")?.as_str()?;
    let reach = entry.get("reach").filter(|v| v.is_object())?;
    let impact = entry.get("impactDrivers").filter(|v| v.is_object())?;
    let confidence = entry.get("confidenceDrivers").filter(|v| v.is_object())?;
    let effort = entry.get("effort").filter(|v| v.is_object())?;

    Some(Initiative {
        id: id.to_string(),
        title: title.to_string(),
        reach: migrate_reach(reach),
        impact_drivers: ImpactInput {
            user_value: number(impact, "userValue"),
            business_value: number(impact, "businessValue"),
            strategic_fit: number(impact, "strategicFit"),
            context: text(impact, "context"),
        },
        confidence_drivers: ConfidenceInput {
            data_quality: number(confidence, "dataQuality"),
            precedent_similarity: number(confidence, "precedentSimilarity"),
            delivery_confidence: number(confidence, "deliveryConfidence"),
            context: text(confidence, "context"),
        },
        effort: EffortInput {
            frontend: number(effort, "frontend"),
            backend: number(effort, "backend"),
            design: number(effort, "design"),
            pm: number(effort, "pm"),
            context: text(effort, "context"),
        },
        created_at: timestamp(entry, "createdAt", now),
        updated_at: timestamp(entry, "updatedAt", now),
    })
}

/// Validate parsed import JSON and convert its entries to the current shape.
///
/// Invalid entries are skipped. Fails if the `entries` array is missing or
/// if no entry survives.
pub fn validate_import_data(value: &Value, now: DateTime<Utc>) -> Result<ImportReport> {
    let Some(raw_entries) = value.get("entries").and_then(Value::as_array) else {
        anyhow::bail!("Invalid data format: missing or invalid entries array");
    };

    let mut entries = Vec::new();
    let mut warnings = Vec::new();
    let mut skipped = 0;

    for raw in raw_entries {
        let Some(initiative) = parse_entry(raw, now) else {
            skipped += 1;
            continue;
        };

        match raw.get("reach").map(classify_reach) {
            Some(ReachShape::Legacy) => warnings.push(format!(
                "'{}': legacy reach converted to acquire mode",
                initiative.title
            )),
            Some(ReachShape::UnknownMode(mode)) => warnings.push(format!(
                "'{}': unrecognized reach mode {}, reach reset to zero",
                initiative.title, mode
            )),
            _ => {}
        }

        entries.push(initiative);
    }

    if entries.is_empty() {
        anyhow::bail!("No valid entries found in the imported file");
    }

    let export_date = value
        .get("exportDate")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| now.to_rfc3339());
    let version = value
        .get("version")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(EXPORT_VERSION)
        .to_string();

    Ok(ImportReport {
        data: ExportData {
            entries,
            export_date,
            version,
        },
        skipped,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initiative::ReachInput;
    use crate::scoring::compute_reach;
    use serde_json::json;

    fn raw_entry(id: &str, reach: Value) -> Value {
        json!({
            "id": id,
            "title": format!("Entry {}", id),
            "reach": reach,
            "impactDrivers": { "userValue": 4, "businessValue": 5, "strategicFit": 4 },
            "confidenceDrivers": { "dataQuality": 85, "precedentSimilarity": 90, "deliveryConfidence": 75 },
            "effort": { "frontend": 80, "backend": 120, "design": 40, "pm": 20 },
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-02T10:00:00Z"
        })
    }

    #[test]
    fn test_missing_entries_array() {
        let err = validate_import_data(&json!({"version": "1.0"}), Utc::now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid data format: missing or invalid entries array"
        );

        let err = validate_import_data(&json!({"entries": "nope"}), Utc::now()).unwrap_err();
        assert!(err.to_string().contains("missing or invalid entries array"));
    }

    #[test]
    fn test_no_valid_entries() {
        let data = json!({ "entries": [ { "id": 1, "title": "bad id" }, {} ] });
        let err = validate_import_data(&data, Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), "No valid entries found in the imported file");
    }

    #[test]
    fn test_skips_invalid_entries() {
        let data = json!({
            "entries": [
                raw_entry("a", json!({"mode": "acquire", "monthlyNewEligible": 500, "adoptionRatePercentage": 30})),
                { "id": "b", "title": "no drivers" }
            ],
            "exportDate": "2024-06-01T00:00:00Z",
            "version": "1.0"
        });
        let report = validate_import_data(&data, Utc::now()).unwrap();
        assert_eq!(report.data.entries.len(), 1);
        assert_eq!(report.skipped, 1);
        assert!(report.warnings.is_empty());
        assert_eq!(report.data.export_date, "2024-06-01T00:00:00Z");
        assert_eq!(compute_reach(&report.data.entries[0].reach), 1800.0);
    }

    #[test]
    fn test_legacy_entries_migrated_with_warning() {
        let data = json!({
            "entries": [
                raw_entry("a", json!({"eligibleToday": 45000, "monthlyGrowth": 1000, "adoptionRatePercentage": 80}))
            ]
        });
        let report = validate_import_data(&data, Utc::now()).unwrap();
        let entry = &report.data.entries[0];
        assert!(matches!(entry.reach, ReachInput::Acquire(_)));
        assert_eq!(compute_reach(&entry.reach), 9600.0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("legacy"));
    }

    #[test]
    fn test_unknown_mode_warns() {
        let data = json!({ "entries": [ raw_entry("a", json!({"mode": "churn", "eligibleToday": 10})) ] });
        let report = validate_import_data(&data, Utc::now()).unwrap();
        assert_eq!(compute_reach(&report.data.entries[0].reach), 0.0);
        assert!(report.warnings[0].contains("unrecognized reach mode"));
    }

    #[test]
    fn test_defaults_for_metadata() {
        let now = Utc::now();
        let mut entry = raw_entry("a", json!({"mode": "acquire"}));
        entry.as_object_mut().unwrap().remove("createdAt");
        let data = json!({ "entries": [entry] });

        let report = validate_import_data(&data, now).unwrap();
        assert_eq!(report.data.version, "1.0");
        assert_eq!(report.data.export_date, now.to_rfc3339());
        assert_eq!(report.data.entries[0].created_at, now);
        assert_eq!(
            report.data.entries[0].updated_at.to_rfc3339(),
            "2024-05-02T10:00:00+00:00"
        );
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        let data = json!({
            "entries": [
                raw_entry("a", json!({"mode": "optimise", "eligibleToday": 600, "monthlyGrowth": 100,
                    "currentAdoptionPercentage": 17, "adoptionRatePercentage": 43}))
            ]
        });
        let imported = validate_import_data(&data, Utc::now()).unwrap();

        let exported = export_entries(&imported.data.entries, Utc::now());
        write_export(&path, &exported).unwrap();

        let reread = read_import(&path).unwrap();
        assert_eq!(reread.data.entries, imported.data.entries);
        assert_eq!(reread.data.version, EXPORT_VERSION);
    }

    #[test]
    fn test_read_import_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_import(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid JSON"));
    }
}
