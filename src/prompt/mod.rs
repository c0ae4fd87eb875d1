pub mod builder;
pub mod guidance;

pub use builder::{build, build_cost_estimate_prompt, maps_search_url, PromptBuilder};
pub use guidance::GuidanceTables;
