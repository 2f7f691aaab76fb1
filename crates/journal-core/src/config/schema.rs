//! JSON Schema validation for engine configuration files.
//!
//! Config files are checked against `schema/engine-config.schema.json` before
//! deserialization, so typos in field names are reported instead of silently
//! falling back to defaults.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

const CONFIG_SCHEMA_JSON: &str = include_str!("../../schema/engine-config.schema.json");

static CONFIG_VALIDATOR: OnceLock<Result<Validator, String>> = OnceLock::new();

/// The compiled config schema. A broken embedded schema is reported on every
/// call rather than once.
fn config_validator() -> Result<&'static Validator, String> {
    CONFIG_VALIDATOR
        .get_or_init(|| {
            let schema: Value = serde_json::from_str(CONFIG_SCHEMA_JSON)
                .map_err(|e| format!("embedded config schema is not JSON: {e}"))?;
            jsonschema::options()
                .build(&schema)
                .map_err(|e| format!("embedded config schema does not compile: {e}"))
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// Check a config document against the schema, collecting every violation
/// as `"<problem> at <json pointer>"`.
pub fn validate_config_schema(config: &Value) -> Result<(), Vec<String>> {
    let validator = config_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(config)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_loads() {
        assert!(config_validator().is_ok());
    }

    #[test]
    fn test_empty_object_is_valid() {
        assert!(validate_config_schema(&json!({})).is_ok());
    }

    #[test]
    fn test_full_config_is_valid() {
        let config = json!({
            "date_window": { "start": "2025-09-01", "end": "2025-12-31" },
            "expected_lesson_totals": [35, 70],
            "theme_max_chars": 120,
            "homework_max_chars": 80
        });
        assert!(validate_config_schema(&config).is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let errors = validate_config_schema(&json!({ "theme_max_char": 10 })).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_bad_date_format_rejected() {
        let config = json!({ "date_window": { "start": "01.01.2025", "end": "2025-06-15" } });
        assert!(validate_config_schema(&config).is_err());
    }

    #[test]
    fn test_every_violation_reported_with_path() {
        let config = json!({ "theme_max_chars": 0, "homework_max_chars": "60" });
        let errors = validate_config_schema(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.ends_with("at /theme_max_chars")));
        assert!(errors.iter().any(|e| e.ends_with("at /homework_max_chars")));
    }

    #[test]
    fn test_empty_totals_rejected() {
        assert!(validate_config_schema(&json!({ "expected_lesson_totals": [] })).is_err());
    }
}
