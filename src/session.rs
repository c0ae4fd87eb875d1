//! Per-session state shared between planner calls.

use tracing::debug;

use crate::types::{CostEstimate, CostQuery};

/// Holds the last cost estimate so repeated renders of the same trip do not
/// query the model again. Create one per user session; call
/// [`PlannerSession::clear_cost_estimates`] when the user starts cost
/// estimation over.
#[derive(Debug, Clone, Default)]
pub struct PlannerSession {
    cost_cache: Option<(CostQuery, CostEstimate)>,
}

impl PlannerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached estimate for exactly this query.
    pub fn cached_estimate(&self, query: &CostQuery) -> Option<&CostEstimate> {
        match &self.cost_cache {
            Some((cached_query, estimate)) if cached_query == query => Some(estimate),
            _ => None,
        }
    }

    pub fn last_estimate(&self) -> Option<&CostEstimate> {
        self.cost_cache.as_ref().map(|(_, estimate)| estimate)
    }

    pub fn store_estimate(&mut self, query: CostQuery, estimate: CostEstimate) {
        debug!(
            target: "trip_planner::session",
            destination = %query.destination,
            "caching cost estimate"
        );
        self.cost_cache = Some((query, estimate));
    }

    pub fn clear_cost_estimates(&mut self) {
        self.cost_cache = None;
    }
}
