use tracing::{debug, info, warn};

use crate::{
    config::PlannerConfig,
    error::{PlannerError, Result},
    extract,
    prompt::{GuidanceTables, PromptBuilder},
    segment::ResponseSegmenter,
    services::chat_client::{
        ChatBackend, ChatClient, ChatCompletionRequest, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    },
    session::PlannerSession,
    types::{CostCategory, CostEstimate, CostQuery, Currency, Itinerary, OptionCatalog, TripPreferences},
};

/// Outcome of a cost-estimate request. Always usable: when the model could
/// not be asked or its reply could not be parsed, `failure` says why and the
/// option labels fall back to the static catalog.
#[derive(Debug)]
pub struct CostLookup {
    pub estimate: Option<CostEstimate>,
    pub failure: Option<PlannerError>,
    pub from_cache: bool,
    currency: Currency,
}

impl CostLookup {
    pub fn is_fallback(&self) -> bool {
        self.estimate.is_none()
    }

    /// Option labels for a category, decorated with price hints when known.
    pub fn options(&self, category: CostCategory) -> Vec<String> {
        OptionCatalog::default().decorated(category, self.estimate.as_ref(), &self.currency)
    }
}

/// Runs the plan pipeline: validate, build the prompt, call the model once,
/// segment the reply.
#[derive(Debug)]
pub struct TripPlanner<B = ChatClient> {
    backend: B,
    model: String,
    temperature: f64,
    prompts: PromptBuilder,
    segmenter: ResponseSegmenter,
}

impl TripPlanner<ChatClient> {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_backend(ChatClient::new(api_key))
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        let client = ChatClient::new(config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout);
        Self::with_backend(client)
            .with_model(config.model.clone())
            .with_temperature(config.temperature)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(&PlannerConfig::from_env()?))
    }
}

impl<B: ChatBackend> TripPlanner<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            prompts: PromptBuilder::default(),
            segmenter: ResponseSegmenter::markdown_headings(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_guidance(mut self, guidance: GuidanceTables) -> Self {
        self.prompts = PromptBuilder::new(guidance);
        self
    }

    pub fn with_segmenter(mut self, segmenter: ResponseSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt_for(&self, prefs: &TripPreferences) -> String {
        self.prompts.build(prefs)
    }

    fn request(&self, prompt: String) -> ChatCompletionRequest {
        ChatCompletionRequest::new(self.model.clone(), prompt).with_temperature(self.temperature)
    }

    /// Generate an itinerary. Invalid preferences are rejected before any
    /// request is sent.
    pub async fn plan(&self, prefs: &TripPreferences) -> Result<Itinerary> {
        prefs.validate()?;

        let prompt = self.prompts.build(prefs);
        info!(
            destination = prefs.destination(),
            days = prefs.num_days(),
            "generating itinerary"
        );
        debug!(target: "trip_planner::prompt", chars = prompt.len());

        let raw = self.backend.complete(&self.request(prompt)).await?;
        let segmentation = self.segmenter.segment(&raw);
        if !segmentation.has_days() {
            warn!("reply contained no day sections, showing it as a single block");
        }
        info!(
            days = segmentation.days.len(),
            header_match = ?segmentation.header_match,
            "itinerary segmented"
        );

        Ok(Itinerary::new(prefs.destination().trim(), raw, segmentation))
    }

    /// Ask the model for price ranges, reusing the session's estimate for an
    /// identical query. Never fails; see [`CostLookup`].
    pub async fn estimate_costs(&self, session: &mut PlannerSession, query: &CostQuery) -> CostLookup {
        if let Err(err) = query.validate() {
            warn!(error = %err, "invalid cost query, not sending request");
            return CostLookup {
                estimate: None,
                failure: Some(err),
                from_cache: false,
                currency: query.currency.clone(),
            };
        }

        if let Some(estimate) = session.cached_estimate(query) {
            debug!(target: "trip_planner::session", "using cached cost estimate");
            return CostLookup {
                estimate: Some(estimate.clone()),
                failure: None,
                from_cache: true,
                currency: query.currency.clone(),
            };
        }

        match self.fetch_estimate(query).await {
            Ok(estimate) => {
                session.store_estimate(query.clone(), estimate.clone());
                CostLookup {
                    estimate: Some(estimate),
                    failure: None,
                    from_cache: false,
                    currency: query.currency.clone(),
                }
            }
            Err(err) => {
                warn!(error = %err, "cost estimate unavailable, using default options");
                CostLookup {
                    estimate: None,
                    failure: Some(err),
                    from_cache: false,
                    currency: query.currency.clone(),
                }
            }
        }
    }

    async fn fetch_estimate(&self, query: &CostQuery) -> Result<CostEstimate> {
        let prompt = self.prompts.cost_estimate_prompt(query);
        info!(destination = %query.destination, "requesting cost estimates");
        let raw = self.backend.complete(&self.request(prompt)).await?;
        Ok(extract::extract(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::HeaderMatch;
    use crate::types::{Interest, Month};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend returning canned replies and recording prompts.
    struct ScriptedBackend {
        replies: Mutex<Vec<Result<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn complete(&self, request: &ChatCompletionRequest) -> Result<String> {
            self.prompts.lock().unwrap().push(request.prompt().to_string());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn prefs() -> TripPreferences {
        TripPreferences::builder("Rome")
            .num_days(2)
            .total_budget(60_000.0)
            .travel_month(Month::May)
            .interest(Interest::History)
            .build()
            .unwrap()
    }

    #[test]
    fn plan_segments_reply() {
        let backend = ScriptedBackend::new(vec![Ok(
            "Buongiorno!\n### Day 1: Ancient Rome\n#### Morning\n- Colosseum\nDay 1 total: 3000\n### Day 2: Vatican\n#### Morning\n- Museums\nDay 2 total: 4000"
                .to_string(),
        )]);
        let planner = TripPlanner::with_backend(backend);

        let itinerary = tokio_test::block_on(planner.plan(&prefs())).unwrap();
        assert_eq!(itinerary.destination, "Rome");
        assert_eq!(itinerary.preamble(), "Buongiorno!");
        assert_eq!(itinerary.header_match(), HeaderMatch::Strict);
        assert_eq!(itinerary.days().len(), 2);
        assert_eq!(itinerary.days()[0].heading(), "Day 1: Ancient Rome");
        assert_eq!(
            itinerary.days()[0].body,
            "#### Morning\n- Colosseum\nDay 1 total: 3000"
        );
        assert!(itinerary.days()[1].body.ends_with("Day 2 total: 4000"));

        let prompts = planner.backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("2-day itinerary for Rome"));
        assert!(prompts[0].contains("### Day 1"));
    }

    #[test]
    fn plain_day_headers_use_fallback() {
        let backend = ScriptedBackend::new(vec![Ok(
            "Day 1: Ancient Rome\n- Colosseum\nDay 2: Vatican\n- Museums".to_string(),
        )]);
        let planner = TripPlanner::with_backend(backend);

        let itinerary = tokio_test::block_on(planner.plan(&prefs())).unwrap();
        assert_eq!(itinerary.header_match(), HeaderMatch::Fallback);
        assert_eq!(itinerary.days().len(), 2);
        assert_eq!(itinerary.days()[1].heading(), "Day 2: Vatican");
    }

    #[test]
    fn api_errors_propagate() {
        let backend = ScriptedBackend::new(vec![Err(PlannerError::Unauthorized)]);
        let planner = TripPlanner::with_backend(backend);
        let err = tokio_test::block_on(planner.plan(&prefs())).unwrap_err();
        assert!(matches!(err, PlannerError::Unauthorized));
    }

    #[test]
    fn estimates_are_cached_per_session() {
        let reply = r#"{"accommodation": {"hotel": {"cost": {"min": 4000, "max": 6000}, "unit": "per night"}}}"#;
        let backend = ScriptedBackend::new(vec![Ok(reply.to_string())]);
        let planner = TripPlanner::with_backend(backend);
        let mut session = PlannerSession::new();
        let query = CostQuery::from(&prefs());

        let first = tokio_test::block_on(planner.estimate_costs(&mut session, &query));
        assert!(!first.from_cache);
        assert_eq!(
            first.options(CostCategory::Accommodation)[0],
            "Hotel (₹4000 - ₹6000 per night)"
        );

        let second = tokio_test::block_on(planner.estimate_costs(&mut session, &query));
        assert!(second.from_cache);
        assert_eq!(planner.backend.calls(), 1);
    }

    #[test]
    fn invalid_query_is_not_sent() {
        let backend = ScriptedBackend::new(vec![]);
        let planner = TripPlanner::with_backend(backend);
        let mut session = PlannerSession::new();
        let query = CostQuery::new("", 0, Month::May, -5.0);

        let lookup = tokio_test::block_on(planner.estimate_costs(&mut session, &query));
        assert!(lookup.is_fallback());
        assert!(matches!(lookup.failure, Some(PlannerError::Validation(_))));
        assert_eq!(planner.backend.calls(), 0);
    }

    #[test]
    fn unparsable_estimate_falls_back_to_catalog() {
        let backend = ScriptedBackend::new(vec![Ok("I cannot give prices.".to_string())]);
        let planner = TripPlanner::with_backend(backend);
        let mut session = PlannerSession::new();
        let query = CostQuery::from(&prefs());

        let lookup = tokio_test::block_on(planner.estimate_costs(&mut session, &query));
        assert!(lookup.is_fallback());
        assert!(matches!(
            lookup.failure,
            Some(PlannerError::CostEstimate(extract::ParseFailure::NoJsonObject))
        ));
        assert_eq!(lookup.options(CostCategory::Dining)[0], "Street food");
        assert!(session.last_estimate().is_none());
    }
}
