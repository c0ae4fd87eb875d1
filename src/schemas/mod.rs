pub mod schema;
pub(crate) mod validation;

pub use schema::{cost_estimate_schema, SchemaHandle};
