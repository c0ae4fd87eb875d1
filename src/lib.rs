//! trip-planner-rs: prompt templating and itinerary segmentation for
//! LLM-backed trip planning.
//!
//! A [`TripPreferences`] record is rendered into a structured prompt, sent to
//! an OpenAI-compatible chat-completion endpoint, and the reply is split into
//! day sections that can be rendered as HTML or exported to Markdown and PDF.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_planner_rs::{types::Interest, TripPlanner, TripPreferences};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let planner = TripPlanner::from_env()?;
//!     let prefs = TripPreferences::builder("Paris")
//!         .num_days(3)
//!         .total_budget(75_000.0)
//!         .interest(Interest::Art)
//!         .build()?;
//!
//!     let itinerary = planner.plan(&prefs).await?;
//!     for day in itinerary.days() {
//!         println!("{}\n{}\n", day.heading(), day.body);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod planner;
pub mod prompt;
pub mod render;
pub mod schemas;
pub mod segment;
pub mod services;
pub mod session;
pub mod types;

pub use config::PlannerConfig;
pub use error::{PlannerError, Result, ValidationErrors};
pub use extract::{extract, ParseFailure};
pub use planner::{CostLookup, TripPlanner};
pub use prompt::{GuidanceTables, PromptBuilder};
pub use segment::{segment, DaySection, HeaderRule, ResponseSegmenter, Segmentation};
pub use services::{ChatBackend, ChatClient, ChatCompletionRequest};
pub use session::PlannerSession;
pub use types::{CostEstimate, CostQuery, Itinerary, TripPreferences};

#[cfg(feature = "cli")]
pub mod cli;
