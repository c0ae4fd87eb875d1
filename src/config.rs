use std::time::Duration;

use crate::error::{PlannerError, Result};
use crate::services::chat_client::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};

pub const API_KEY_VARS: [&str; 2] = ["GROQ_API_KEY", "TRIP_PLANNER_API_KEY"];
pub const BASE_URL_VAR: &str = "TRIP_PLANNER_BASE_URL";
pub const MODEL_VAR: &str = "TRIP_PLANNER_MODEL";
pub const TEMPERATURE_VAR: &str = "TRIP_PLANNER_TEMPERATURE";
pub const TIMEOUT_VAR: &str = "TRIP_PLANNER_TIMEOUT_SECS";

/// Connection settings for the completion endpoint.
#[derive(Clone, PartialEq)]
pub struct PlannerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    /// No timeout unless configured.
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PlannerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
        }
    }

    /// Read settings from the process environment. Call `dotenvy::dotenv()`
    /// first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`PlannerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
            .ok_or_else(|| {
                PlannerError::Config(format!(
                    "API key is required. Set {} or pass --api-key",
                    API_KEY_VARS.join(" or ")
                ))
            })?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(model) = lookup(MODEL_VAR) {
            config.model = model;
        }
        if let Some(raw) = lookup(TEMPERATURE_VAR) {
            config.temperature = parse_temperature(&raw)?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config.timeout = Some(parse_timeout(&raw)?);
        }

        Ok(config)
    }
}

pub fn parse_temperature(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PlannerError::Config(format!("invalid temperature `{}`", raw)))?;
    if !(0.0..=2.0).contains(&value) {
        return Err(PlannerError::Config(format!(
            "temperature must be between 0 and 2, got {}",
            value
        )));
    }
    Ok(value)
}

pub fn parse_timeout(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| PlannerError::Config(format!("invalid timeout `{}` (seconds)", raw)))
}
