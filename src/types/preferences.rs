use serde::{Deserialize, Serialize};

use super::choices::{Accommodation, Companions, Dining, Interest, Month, Pace, Transportation};
use crate::error::{Result, ValidationErrors};

/// Currency that amounts are quoted in, both in prompts and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// ISO-4217 code (e.g. "INR")
    pub code: String,
    /// Symbol placed before amounts (e.g. "₹")
    pub symbol: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            symbol: symbol.into(),
        }
    }

    /// Render an amount with the currency symbol, dropping `.00` on whole numbers.
    pub fn format(&self, amount: f64) -> String {
        format!("{}{}", self.symbol, format_amount(amount))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::new("INR", "₹")
    }
}

pub(crate) fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Per-category budget whose sum is the trip total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub accommodation: f64,
    pub activities: f64,
    pub dining: f64,
    pub transportation: f64,
}

impl BudgetBreakdown {
    pub fn total(&self) -> f64 {
        self.accommodation + self.activities + self.dining + self.transportation
    }

    /// Category name and amount, in prompt order.
    pub fn categories(&self) -> [(&'static str, f64); 4] {
        [
            ("Accommodation", self.accommodation),
            ("Activities", self.activities),
            ("Dining", self.dining),
            ("Transportation", self.transportation),
        ]
    }
}

/// Trip budget: a single amount or a per-category split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Total(f64),
    Breakdown(BudgetBreakdown),
}

impl Budget {
    pub fn total(&self) -> f64 {
        match self {
            Budget::Total(amount) => *amount,
            Budget::Breakdown(breakdown) => breakdown.total(),
        }
    }
}

/// An interest with an optional 1-5 importance rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestChoice {
    pub interest: Interest,
    pub importance: Option<u8>,
}

/// Everything the traveler told us about the trip.
///
/// Built through [`TripPreferencesBuilder`], which rejects records that break
/// the invariants (non-empty destination and interests, at least one day, a
/// positive budget). Fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPreferences {
    destination: String,
    num_days: u32,
    budget: Budget,
    currency: Currency,
    travel_month: Month,
    companions: Companions,
    child_ages: Option<String>,
    interests: Vec<InterestChoice>,
    accommodation: Accommodation,
    transportation: Transportation,
    dining: Dining,
    pace: Pace,
    special_requests: Option<String>,
    dietary_restrictions: Option<String>,
    accessibility_needs: Option<String>,
    nationality: Option<String>,
}

impl TripPreferences {
    pub fn builder(destination: impl Into<String>) -> TripPreferencesBuilder {
        TripPreferencesBuilder::new(destination)
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn travel_month(&self) -> Month {
        self.travel_month
    }

    pub fn companions(&self) -> Companions {
        self.companions
    }

    pub fn child_ages(&self) -> Option<&str> {
        self.child_ages.as_deref()
    }

    pub fn interests(&self) -> &[InterestChoice] {
        &self.interests
    }

    pub fn accommodation(&self) -> Accommodation {
        self.accommodation
    }

    pub fn transportation(&self) -> Transportation {
        self.transportation
    }

    pub fn dining(&self) -> Dining {
        self.dining
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    pub fn dietary_restrictions(&self) -> Option<&str> {
        self.dietary_restrictions.as_deref()
    }

    pub fn accessibility_needs(&self) -> Option<&str> {
        self.accessibility_needs.as_deref()
    }

    pub fn nationality(&self) -> Option<&str> {
        self.nationality.as_deref()
    }

    /// Interests ordered by importance, highest first. Unrated interests keep
    /// their selection order after the rated ones.
    pub fn interests_by_priority(&self) -> Vec<InterestChoice> {
        let mut ordered = self.interests.clone();
        ordered.sort_by(|a, b| b.importance.unwrap_or(0).cmp(&a.importance.unwrap_or(0)));
        ordered
    }

    /// Check every invariant, collecting all problems.
    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new();

        if self.destination.trim().is_empty() {
            errors.push("destination", "Please enter a destination.");
        }
        if self.num_days < 1 {
            errors.push("num_days", "Number of days must be at least 1.");
        }

        match &self.budget {
            Budget::Total(amount) => {
                if !amount.is_finite() || *amount <= 0.0 {
                    errors.push("budget", "Budget must be greater than 0.");
                }
            }
            Budget::Breakdown(breakdown) => {
                if breakdown
                    .categories()
                    .iter()
                    .any(|(_, amount)| !amount.is_finite() || *amount < 0.0)
                {
                    errors.push("budget", "Budget categories cannot be negative.");
                } else if breakdown.total() <= 0.0 {
                    errors.push("budget", "Budget must be greater than 0.");
                }
            }
        }

        if self.interests.is_empty() {
            errors.push("interests", "Please select at least one interest.");
        }
        if self
            .interests
            .iter()
            .filter_map(|choice| choice.importance)
            .any(|rating| !(1..=5).contains(&rating))
        {
            errors.push("interests", "Interest importance must be between 1 and 5.");
        }

        errors.into_result()
    }
}

/// Builder for [`TripPreferences`]. Unset choices default to the first catalog
/// entry (Solo, Hotel, Public transit, Street food, January), except pace which
/// defaults to Moderate.
#[derive(Debug, Clone)]
pub struct TripPreferencesBuilder {
    record: TripPreferences,
}

impl TripPreferencesBuilder {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            record: TripPreferences {
                destination: destination.into(),
                num_days: 1,
                budget: Budget::Total(0.0),
                currency: Currency::default(),
                travel_month: Month::January,
                companions: Companions::Solo,
                child_ages: None,
                interests: Vec::new(),
                accommodation: Accommodation::Hotel,
                transportation: Transportation::PublicTransit,
                dining: Dining::StreetFood,
                pace: Pace::Moderate,
                special_requests: None,
                dietary_restrictions: None,
                accessibility_needs: None,
                nationality: None,
            },
        }
    }

    pub fn num_days(mut self, num_days: u32) -> Self {
        self.record.num_days = num_days;
        self
    }

    pub fn budget(mut self, budget: Budget) -> Self {
        self.record.budget = budget;
        self
    }

    pub fn total_budget(self, amount: f64) -> Self {
        self.budget(Budget::Total(amount))
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.record.currency = currency;
        self
    }

    pub fn travel_month(mut self, month: Month) -> Self {
        self.record.travel_month = month;
        self
    }

    pub fn companions(mut self, companions: Companions) -> Self {
        self.record.companions = companions;
        self
    }

    pub fn child_ages(mut self, ages: impl Into<String>) -> Self {
        self.record.child_ages = non_blank(ages.into());
        self
    }

    /// Add an interest; adding it again replaces the earlier rating.
    pub fn interest(self, interest: Interest) -> Self {
        self.push_interest(interest, None)
    }

    pub fn rated_interest(self, interest: Interest, importance: u8) -> Self {
        self.push_interest(interest, Some(importance))
    }

    fn push_interest(mut self, interest: Interest, importance: Option<u8>) -> Self {
        match self
            .record
            .interests
            .iter_mut()
            .find(|choice| choice.interest == interest)
        {
            Some(existing) => existing.importance = importance,
            None => self.record.interests.push(InterestChoice {
                interest,
                importance,
            }),
        }
        self
    }

    pub fn accommodation(mut self, accommodation: Accommodation) -> Self {
        self.record.accommodation = accommodation;
        self
    }

    pub fn transportation(mut self, transportation: Transportation) -> Self {
        self.record.transportation = transportation;
        self
    }

    pub fn dining(mut self, dining: Dining) -> Self {
        self.record.dining = dining;
        self
    }

    pub fn pace(mut self, pace: Pace) -> Self {
        self.record.pace = pace;
        self
    }

    pub fn special_requests(mut self, text: impl Into<String>) -> Self {
        self.record.special_requests = non_blank(text.into());
        self
    }

    pub fn dietary_restrictions(mut self, text: impl Into<String>) -> Self {
        self.record.dietary_restrictions = non_blank(text.into());
        self
    }

    pub fn accessibility_needs(mut self, text: impl Into<String>) -> Self {
        self.record.accessibility_needs = non_blank(text.into());
        self
    }

    pub fn nationality(mut self, text: impl Into<String>) -> Self {
        self.record.nationality = non_blank(text.into());
        self
    }

    /// Validate and freeze the record.
    pub fn build(self) -> Result<TripPreferences> {
        self.record.validate()?;
        Ok(self.record)
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;

    fn paris() -> TripPreferencesBuilder {
        TripPreferences::builder("Paris")
            .num_days(3)
            .total_budget(50_000.0)
            .interest(Interest::Art)
    }

    #[test]
    fn builds_valid_record() {
        let prefs = paris().build().unwrap();
        assert_eq!(prefs.destination(), "Paris");
        assert_eq!(prefs.budget().total(), 50_000.0);
        assert_eq!(prefs.currency().code, "INR");
    }

    #[test]
    fn reports_every_problem() {
        let err = TripPreferences::builder("   ")
            .num_days(0)
            .total_budget(0.0)
            .build()
            .unwrap_err();

        let PlannerError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 4);
        assert!(errors.has_field("destination"));
        assert!(errors.has_field("num_days"));
        assert!(errors.has_field("budget"));
        assert!(errors.has_field("interests"));
    }

    #[test]
    fn breakdown_total_is_sum() {
        let breakdown = BudgetBreakdown {
            accommodation: 20_000.0,
            activities: 10_000.0,
            dining: 8_000.0,
            transportation: 2_000.0,
        };
        let prefs = paris().budget(Budget::Breakdown(breakdown)).build().unwrap();
        assert_eq!(prefs.budget().total(), 40_000.0);
    }

    #[test]
    fn negative_category_is_rejected() {
        let breakdown = BudgetBreakdown {
            accommodation: 20_000.0,
            activities: -1.0,
            dining: 0.0,
            transportation: 0.0,
        };
        let err = paris().budget(Budget::Breakdown(breakdown)).build().unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn ratings_must_be_in_range() {
        assert!(paris().rated_interest(Interest::Food, 6).build().is_err());
        assert!(paris().rated_interest(Interest::Food, 5).build().is_ok());
    }

    #[test]
    fn interests_sorted_by_importance() {
        let prefs = paris()
            .rated_interest(Interest::Food, 5)
            .interest(Interest::Shopping)
            .rated_interest(Interest::History, 3)
            .build()
            .unwrap();

        let order: Vec<Interest> = prefs
            .interests_by_priority()
            .iter()
            .map(|choice| choice.interest)
            .collect();
        assert_eq!(
            order,
            vec![Interest::Food, Interest::History, Interest::Art, Interest::Shopping]
        );
    }

    #[test]
    fn repeated_interest_replaces_rating() {
        let prefs = paris().rated_interest(Interest::Art, 2).build().unwrap();
        assert_eq!(prefs.interests().len(), 1);
        assert_eq!(prefs.interests()[0].importance, Some(2));
    }

    #[test]
    fn blank_optional_text_is_dropped() {
        let prefs = paris().child_ages("  ").nationality("Indian").build().unwrap();
        assert_eq!(prefs.child_ages(), None);
        assert_eq!(prefs.nationality(), Some("Indian"));
    }

    #[test]
    fn currency_formatting() {
        let inr = Currency::default();
        assert_eq!(inr.format(2500.0), "₹2500");
        assert_eq!(inr.format(12.5), "₹12.50");
    }
}
