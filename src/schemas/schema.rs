use schemars::{schema::RootSchema, JsonSchema};
use serde_json::Value;
use std::sync::{Arc, OnceLock};

use crate::types::CostEstimate;

/// Cached JSON schema for a type the model is asked to produce.
#[derive(Clone, Debug)]
pub struct SchemaHandle {
    schema_name: &'static str,
    schema_json: Arc<Value>,
}

impl SchemaHandle {
    pub fn for_type<T: JsonSchema>(schema_name: &'static str) -> Self {
        Self::from_root_schema(schema_name, schemars::schema_for!(T))
    }

    pub fn from_root_schema(schema_name: &'static str, root: RootSchema) -> Self {
        // RootSchema is plain data; serializing it cannot fail.
        let schema_json = serde_json::to_value(root).unwrap_or(Value::Bool(true));

        Self {
            schema_name,
            schema_json: Arc::new(schema_json),
        }
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }
}

/// Schema of the cost table requested by the cost-estimate prompt.
pub fn cost_estimate_schema() -> &'static SchemaHandle {
    static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
    HANDLE.get_or_init(|| SchemaHandle::for_type::<CostEstimate>("CostEstimate"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_schema_describes_categories() {
        let schema = cost_estimate_schema().schema_json();
        assert_eq!(schema["type"], "object");
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("accommodation"));
        assert!(props.contains_key("dining"));
        assert!(props.contains_key("transportation"));
        assert!(schema["definitions"]["OptionCost"].is_object());
    }
}
