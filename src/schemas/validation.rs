use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use super::schema::SchemaHandle;

const MAX_SCHEMA_ERRORS: usize = 3;

/// Validate a payload against a schema, returning a short description of
/// the first few violations on failure.
pub(crate) fn validate_payload(schema: &SchemaHandle, payload: &Value) -> Result<(), String> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            format!(
                "failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            )
        })?;

    if let Err(errors) = validator.validate(payload) {
        let mut details = Vec::new();
        let mut truncated = false;

        for (idx, error) in errors.enumerate() {
            if idx < MAX_SCHEMA_ERRORS {
                let mut path = error.instance_path.to_string();
                if path.is_empty() {
                    path = "<root>".to_string();
                }
                details.push(format!("{}: {}", path, error));
            } else {
                truncated = true;
                break;
            }
        }

        let mut detail_str = if details.is_empty() {
            "payload failed schema validation".to_string()
        } else {
            details.join("; ")
        };

        if truncated {
            detail_str.push_str("; additional errors truncated");
        }

        return Err(format!(
            "payload does not match `{}` schema: {}",
            schema.schema_name(),
            detail_str
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::cost_estimate_schema;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_table() {
        let payload = json!({
            "accommodation": {
                "hotel": { "cost": { "min": 2500, "max": 3000 }, "unit": "per night" }
            }
        });
        assert!(validate_payload(cost_estimate_schema(), &payload).is_ok());
    }

    #[test]
    fn reports_path_of_bad_value() {
        let payload = json!({
            "dining": {
                "street food": { "cost": { "min": "cheap", "max": 200 }, "unit": "per meal" }
            }
        });
        let err = validate_payload(cost_estimate_schema(), &payload).unwrap_err();
        assert!(err.contains("/dining/street food/cost/min"), "{}", err);
    }
}
