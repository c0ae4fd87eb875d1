use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::choices::{Accommodation, Dining, Month, Transportation};
use super::preferences::{format_amount, Currency, TripPreferences};
use crate::error::{Result, ValidationErrors};

/// Trip facts a cost estimate depends on. Two equal queries can share one
/// estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostQuery {
    pub destination: String,
    pub num_days: u32,
    pub travel_month: Month,
    pub total_budget: f64,
    pub currency: Currency,
}

impl CostQuery {
    pub fn new(
        destination: impl Into<String>,
        num_days: u32,
        travel_month: Month,
        total_budget: f64,
    ) -> Self {
        Self {
            destination: destination.into(),
            num_days,
            travel_month,
            total_budget,
            currency: Currency::default(),
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Same trip checks as [`TripPreferences::validate`], minus interests.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if self.destination.trim().is_empty() {
            errors.push("destination", "Please enter a destination.");
        }
        if self.num_days < 1 {
            errors.push("num_days", "Number of days must be at least 1.");
        }
        if !self.total_budget.is_finite() || self.total_budget <= 0.0 {
            errors.push("budget", "Budget must be greater than 0.");
        }

        errors.into_result()
    }
}

impl From<&TripPreferences> for CostQuery {
    fn from(prefs: &TripPreferences) -> Self {
        Self {
            destination: prefs.destination().to_string(),
            num_days: prefs.num_days(),
            travel_month: prefs.travel_month(),
            total_budget: prefs.budget().total(),
            currency: prefs.currency().clone(),
        }
    }
}

/// Price range the model quoted for one option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CostRange {
    /// Lower bound in the trip currency
    pub min: f64,
    /// Upper bound in the trip currency
    pub max: f64,
}

/// Estimated cost of one option, e.g. a hostel per night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptionCost {
    pub cost: CostRange,
    /// Billing unit such as "per night", "per meal" or "per km"
    pub unit: String,
}

/// Cost hints returned by the model, keyed by lowercase option label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CostEstimate {
    #[serde(default)]
    pub accommodation: BTreeMap<String, OptionCost>,
    #[serde(default)]
    pub dining: BTreeMap<String, OptionCost>,
    #[serde(default)]
    pub transportation: BTreeMap<String, OptionCost>,
}

/// The three categories the model is asked to price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostCategory {
    Accommodation,
    Dining,
    Transportation,
}

impl CostCategory {
    pub const ALL: [CostCategory; 3] = [
        CostCategory::Accommodation,
        CostCategory::Dining,
        CostCategory::Transportation,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CostCategory::Accommodation => "accommodation",
            CostCategory::Dining => "dining",
            CostCategory::Transportation => "transportation",
        }
    }
}

impl CostEstimate {
    pub fn category(&self, category: CostCategory) -> &BTreeMap<String, OptionCost> {
        match category {
            CostCategory::Accommodation => &self.accommodation,
            CostCategory::Dining => &self.dining,
            CostCategory::Transportation => &self.transportation,
        }
    }

    /// Look up an option by its label, ignoring case.
    pub fn lookup(&self, category: CostCategory, option: &str) -> Option<&OptionCost> {
        let wanted = option.trim().to_lowercase();
        self.category(category)
            .iter()
            .find(|(key, _)| key.trim().to_lowercase() == wanted)
            .map(|(_, cost)| cost)
    }

    pub fn is_empty(&self) -> bool {
        self.accommodation.is_empty() && self.dining.is_empty() && self.transportation.is_empty()
    }
}

/// Static option labels offered when no estimate is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCatalog {
    pub accommodation: Vec<String>,
    pub dining: Vec<String>,
    pub transportation: Vec<String>,
}

impl Default for OptionCatalog {
    fn default() -> Self {
        Self {
            accommodation: Accommodation::ALL
                .iter()
                .map(|choice| choice.label().to_string())
                .collect(),
            dining: Dining::ALL
                .iter()
                .map(|choice| choice.label().to_string())
                .collect(),
            transportation: Transportation::ALL
                .iter()
                .map(|choice| choice.label().to_string())
                .collect(),
        }
    }
}

impl OptionCatalog {
    pub fn options(&self, category: CostCategory) -> &[String] {
        match category {
            CostCategory::Accommodation => &self.accommodation,
            CostCategory::Dining => &self.dining,
            CostCategory::Transportation => &self.transportation,
        }
    }

    /// Options of a category relabelled with their price hint when known.
    pub fn decorated(
        &self,
        category: CostCategory,
        estimate: Option<&CostEstimate>,
        currency: &Currency,
    ) -> Vec<String> {
        self.options(category)
            .iter()
            .map(|option| decorate(category, option, estimate, currency))
            .collect()
    }
}

/// Price-hint key used by the model for an option label. The cost prompt asks
/// for "car rental" while the preference catalog calls it "Rental car".
pub fn cost_key(category: CostCategory, option: &str) -> String {
    let key = option.trim().to_lowercase();
    if category == CostCategory::Transportation && key == "rental car" {
        return "car rental".to_string();
    }
    key
}

/// `Hotel (₹2500 - ₹3000 per night)`, or just `Hotel` without an estimate.
pub fn decorate(
    category: CostCategory,
    option: &str,
    estimate: Option<&CostEstimate>,
    currency: &Currency,
) -> String {
    let Some(cost) = estimate.and_then(|estimate| estimate.lookup(category, &cost_key(category, option)))
    else {
        return option.to_string();
    };

    format!(
        "{} ({}{} - {}{} {})",
        option,
        currency.symbol,
        format_amount(cost.cost.min),
        currency.symbol,
        format_amount(cost.cost.max),
        cost.unit
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_validation_lists_every_problem() {
        assert!(CostQuery::new("Goa", 3, Month::March, 20_000.0).validate().is_ok());

        let err = CostQuery::new(" ", 0, Month::March, 0.0).validate().unwrap_err();
        match err {
            crate::PlannerError::Validation(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors.has_field("destination"));
                assert!(errors.has_field("num_days"));
                assert!(errors.has_field("budget"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn estimate() -> CostEstimate {
        let mut estimate = CostEstimate::default();
        estimate.accommodation.insert(
            "Hotel".to_string(),
            OptionCost {
                cost: CostRange {
                    min: 2500.0,
                    max: 3000.0,
                },
                unit: "per night".to_string(),
            },
        );
        estimate.transportation.insert(
            "car rental".to_string(),
            OptionCost {
                cost: CostRange {
                    min: 800.0,
                    max: 1500.0,
                },
                unit: "per day".to_string(),
            },
        );
        estimate
    }

    #[test]
    fn decorates_known_options() {
        let estimate = estimate();
        let inr = Currency::default();

        assert_eq!(
            decorate(CostCategory::Accommodation, "Hotel", Some(&estimate), &inr),
            "Hotel (₹2500 - ₹3000 per night)"
        );
        assert_eq!(
            decorate(CostCategory::Transportation, "Rental car", Some(&estimate), &inr),
            "Rental car (₹800 - ₹1500 per day)"
        );
        assert_eq!(
            decorate(CostCategory::Accommodation, "Hostel", Some(&estimate), &inr),
            "Hostel"
        );
        assert_eq!(decorate(CostCategory::Dining, "Fine dining", None, &inr), "Fine dining");
    }

    #[test]
    fn default_catalog_matches_choices() {
        let catalog = OptionCatalog::default();
        assert_eq!(catalog.accommodation.len(), 5);
        assert_eq!(catalog.dining[2], "Fine dining");
        assert_eq!(catalog.transportation[1], "Rental car");

        let labels = catalog.decorated(
            CostCategory::Accommodation,
            Some(&estimate()),
            &Currency::default(),
        );
        assert_eq!(labels[0], "Hotel (₹2500 - ₹3000 per night)");
        assert_eq!(labels[1], "Hostel");
    }
}
