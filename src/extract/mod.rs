//! Pulling the cost table out of a free-text model reply.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::schemas::{cost_estimate_schema, validation::validate_payload};
use crate::types::CostEstimate;

/// Why a reply could not be turned into a [`CostEstimate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("reply does not contain a JSON object")]
    NoJsonObject,

    #[error("invalid JSON in reply: {0}")]
    InvalidJson(String),

    #[error("unexpected cost table structure: {0}")]
    SchemaMismatch(String),
}

/// Slice from the first `{` to the last `}`, if both exist in that order.
pub fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parse the cost table embedded in `raw`. Surrounding prose and code
/// fences are ignored.
pub fn extract(raw: &str) -> Result<CostEstimate, ParseFailure> {
    let candidate = json_object_span(raw).ok_or(ParseFailure::NoJsonObject)?;

    let value: Value = serde_json::from_str(candidate)
        .map_err(|err| ParseFailure::InvalidJson(err.to_string()))?;

    let schema = cost_estimate_schema();
    if let Err(detail) = validate_payload(schema, &value) {
        debug!(
            target: "trip_planner::extract",
            schema = schema.schema_name(),
            error = %detail,
            payload = %value
        );
        return Err(ParseFailure::SchemaMismatch(detail));
    }

    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        ParseFailure::SchemaMismatch(format!("at {}: {}", location, err.inner()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CostCategory;

    #[test]
    fn parses_object_inside_prose() {
        let reply = r#"Sure! Here are the estimates:
```json
{"accommodation": {"hotel": {"cost": {"min": 2500, "max": 3000}, "unit": "per night"}},
 "dining": {"street food": {"cost": {"min": 100, "max": 200}, "unit": "per meal"}}}
```
Prices vary by season."#;

        let estimate = extract(reply).unwrap();
        let hotel = estimate.lookup(CostCategory::Accommodation, "Hotel").unwrap();
        assert_eq!(hotel.cost.min, 2500.0);
        assert_eq!(hotel.unit, "per night");
        assert!(estimate.transportation.is_empty());
    }

    #[test]
    fn missing_braces_is_a_failure() {
        assert_eq!(extract("no json here"), Err(ParseFailure::NoJsonObject));
        assert_eq!(extract("} backwards {"), Err(ParseFailure::NoJsonObject));
        assert_eq!(extract(""), Err(ParseFailure::NoJsonObject));
    }

    #[test]
    fn malformed_json_is_a_failure() {
        let err = extract("{\"accommodation\": {\"hotel\": }").unwrap_err();
        assert!(matches!(err, ParseFailure::InvalidJson(_)));
    }

    #[test]
    fn wrong_shape_is_a_failure() {
        let err = extract(r#"{"accommodation": {"hotel": {"cost": 2500, "unit": "per night"}}}"#)
            .unwrap_err();
        assert!(matches!(err, ParseFailure::SchemaMismatch(_)));
    }

    #[test]
    fn span_covers_first_to_last_brace() {
        assert_eq!(json_object_span("a {x} b {y} c"), Some("{x} b {y}"));
        assert_eq!(json_object_span("{"), None);
    }
}
