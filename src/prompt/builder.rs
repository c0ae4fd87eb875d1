use serde_json::{json, Map, Value};

use super::guidance::GuidanceTables;
use crate::types::{
    cost_key, Budget, Companions, CostCategory, CostQuery, InterestChoice, OptionCatalog,
    TripPreferences,
};

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Google Maps search link for a place, with the query form-urlencoded
/// (`Louvre Museum` + `Paris` -> `Louvre+Museum+Paris`).
pub fn maps_search_url(place: &str, location: &str) -> String {
    let query = format!("{} {}", place.trim(), location.trim());
    let encoded: String = url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
    format!("{}{}", MAPS_SEARCH_BASE, encoded)
}

/// Builds itinerary prompts from a preference record.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    guidance: GuidanceTables,
}

impl PromptBuilder {
    pub fn new(guidance: GuidanceTables) -> Self {
        Self { guidance }
    }

    pub fn guidance(&self) -> &GuidanceTables {
        &self.guidance
    }

    pub fn build(&self, prefs: &TripPreferences) -> String {
        build(prefs, &self.guidance)
    }

    pub fn cost_estimate_prompt(&self, query: &CostQuery) -> String {
        build_cost_estimate_prompt(query)
    }
}

/// Render the itinerary prompt. Pure: the same record and tables always give
/// the same text.
pub fn build(prefs: &TripPreferences, guidance: &GuidanceTables) -> String {
    let currency = prefs.currency();
    let total = currency.format(prefs.budget().total());
    let destination = prefs.destination().trim();
    let interests = describe_interests(&prefs.interests_by_priority());
    let pace = prefs.pace();

    let mut lines = Vec::new();

    lines.push(format!(
        "Create a {}-day itinerary for {} with a total budget of {} ({}).",
        prefs.num_days(),
        destination,
        total,
        currency.code
    ));
    lines.push(format!(
        "The traveler is a {} who prioritizes interests as follows: {}.",
        prefs.companions().prompt_form(),
        interests
    ));
    if let Some(clause) = family_clause(prefs) {
        lines.push(clause);
    }
    lines.push(format!(
        "They prefer {} for accommodations, {} for transportation, and {} for dining.",
        prefs.accommodation().prompt_form(),
        prefs.transportation().prompt_form(),
        prefs.dining().prompt_form()
    ));
    let pace_description = guidance.pace(pace);
    if pace_description.is_empty() {
        lines.push(format!("The overall pace should be {}.", pace.prompt_form()));
    } else {
        lines.push(format!(
            "The overall pace should be {}, meaning {}.",
            pace.prompt_form(),
            pace_description
        ));
    }

    lines.push(String::new());
    lines.push("**Budget Allocation:**".to_string());
    match prefs.budget() {
        Budget::Total(amount) => {
            lines.push(format!(
                "- Total: {} across accommodation, activities, dining and transportation",
                currency.format(*amount)
            ));
        }
        Budget::Breakdown(breakdown) => {
            for (category, amount) in breakdown.categories() {
                lines.push(format!("- {}: {}", category, currency.format(amount)));
            }
        }
    }

    lines.push(String::new());
    lines.push("**Traveler Details:**".to_string());
    lines.push(format!(
        "- Special requests: {}",
        prefs.special_requests().unwrap_or("None")
    ));
    lines.push(format!(
        "- Dietary restrictions: {}",
        prefs.dietary_restrictions().unwrap_or("None")
    ));
    lines.push(format!(
        "- Accessibility needs: {}",
        prefs.accessibility_needs().unwrap_or("None")
    ));
    lines.push(format!(
        "- Nationality: {}",
        prefs.nationality().unwrap_or("None")
    ));
    lines.push(format!(
        "- Travel month: {} (prioritize activities suitable for this season)",
        prefs.travel_month()
    ));

    let guidance_lines: Vec<String> = [
        ("companions", guidance.companions(prefs.companions())),
        ("transportation", guidance.transportation(prefs.transportation())),
        ("dining", guidance.dining(prefs.dining())),
    ]
    .iter()
    .filter(|(_, text)| !text.is_empty())
    .map(|(topic, text)| format!("- For {}: {}", topic, text))
    .collect();
    if !guidance_lines.is_empty() {
        lines.push(String::new());
        lines.push("**Guidance:**".to_string());
        lines.extend(guidance_lines);
    }

    lines.push(String::new());
    lines.push("**Itinerary Requirements:**".to_string());
    lines.push("- Format the itinerary in markdown using ### for each day (e.g., ### Day 1) and #### for time slots (e.g., #### Morning, #### Afternoon, #### Evening).".to_string());
    lines.push("- Use bullet points to list activities under each time slot.".to_string());
    lines.push("- For each activity or dining option, include:".to_string());
    lines.push("  - A brief description (1-2 sentences).".to_string());
    lines.push(format!(
        "  - Estimated cost in {} (covering entrance fees and meals, excluding transportation costs).",
        currency.code
    ));
    lines.push("- When referencing specific places, destinations, museums, restaurants, or activities, output the place name as a clickable Markdown hyperlink in this format:".to_string());
    lines.push(format!(
        "  [Place Name]({}Activity+Name+at+Location+Name)",
        MAPS_SEARCH_BASE
    ));
    lines.push(format!(
        "  For example: [Louvre Museum]({})",
        maps_search_url("Louvre Museum", "Paris")
    ));
    lines.push(format!(
        "- At the end of each day, provide a total estimated cost for that day in {}.",
        currency.code
    ));

    let audience = match prefs.nationality() {
        Some(nationality) => format!("{} travelers", nationality.trim()),
        None => "international travelers".to_string(),
    };
    lines.push(String::new());
    lines.push("**Cultural Notes:**".to_string());
    lines.push(format!(
        "- Briefly explain any local terms, cuisines, or customs that may be unfamiliar to {}.",
        audience
    ));
    lines.push("  For example, if mentioning 'Gelato' in Italy, note: '(Gelato is a creamy Italian frozen dessert similar to ice cream but richer in texture).'".to_string());
    lines.push("- Integrate these explanations naturally within the activity descriptions.".to_string());

    lines.push(String::new());
    lines.push("**Budget Instructions:**".to_string());
    lines.push(format!(
        "- Ensure the total cost (accommodation, activities, dining, and transportation) does not exceed {}.",
        total
    ));
    lines.push(format!(
        "- Allocate the budget across all categories as specified and convert all costs to {} using up-to-date exchange rates.",
        currency.code
    ));
    lines.push("- Itemize costs for each activity and provide a daily total.".to_string());

    lines.push(String::new());
    lines.push("**Summary Section:**".to_string());
    lines.push(format!(
        "- At the end of the itinerary, include a summary table in markdown breaking down the total estimated cost by category (accommodation, activities, dining, transportation) and compare each category with its allocation to confirm the plan stays within {}.",
        total
    ));

    lines.push(String::new());
    lines.push("**Constraints:**".to_string());
    lines.push(format!(
        "- Strictly adhere to dietary restrictions ({}), accessibility needs ({}), and special requests ({}).",
        prefs.dietary_restrictions().unwrap_or("None"),
        prefs.accessibility_needs().unwrap_or("None"),
        prefs.special_requests().unwrap_or("None")
    ));
    lines.push(format!(
        "- Since travel is in {}, include seasonal activities or events, e.g., festivals or weather-specific options.",
        prefs.travel_month()
    ));

    lines.push(String::new());
    lines.push("**Personalized Tips:**".to_string());
    lines.push(format!(
        "- Since the traveler is interested in {}, suggest 2-3 local experiences that match these interests.",
        interests
    ));

    lines.push(String::new());
    lines.push("**Weather Information:**".to_string());
    lines.push(format!(
        "- Describe the typical weather in {} during {} (average temperatures and conditions) and what to pack.",
        destination,
        prefs.travel_month()
    ));

    lines.join("\n")
}

fn describe_interests(interests: &[InterestChoice]) -> String {
    interests
        .iter()
        .map(|choice| match choice.importance {
            Some(rating) => format!("{} (importance {}/5)", choice.interest, rating),
            None => choice.interest.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn family_clause(prefs: &TripPreferences) -> Option<String> {
    if prefs.companions() != Companions::Family {
        return None;
    }
    let ages = prefs.child_ages()?;
    Some(format!(
        "For family travelers, include activities suitable for children aged {}.",
        ages
    ))
}

fn unit_for(category: CostCategory, key: &str) -> &'static str {
    match (category, key) {
        (CostCategory::Accommodation, _) => "per night",
        (CostCategory::Dining, _) => "per meal",
        (CostCategory::Transportation, "taxi") => "per km",
        (CostCategory::Transportation, "public transit") => "per trip",
        (CostCategory::Transportation, _) => "per day",
    }
}

/// Example of the JSON shape requested from the model.
fn cost_estimate_example(catalog: &OptionCatalog) -> Value {
    let mut root = Map::new();
    for category in CostCategory::ALL {
        let mut options = Map::new();
        for option in catalog.options(category) {
            let key = cost_key(category, option);
            let unit = unit_for(category, &key);
            options.insert(
                key,
                json!({ "cost": { "min": 100, "max": 200 }, "unit": unit }),
            );
        }
        root.insert(category.key().to_string(), Value::Object(options));
    }
    Value::Object(root)
}

/// Prompt asking the model for a JSON table of cost ranges per option.
pub fn build_cost_estimate_prompt(query: &CostQuery) -> String {
    let catalog = OptionCatalog::default();
    let currency = &query.currency;
    let example = serde_json::to_string_pretty(&cost_estimate_example(&catalog))
        .unwrap_or_else(|_| "{}".to_string());

    let mut lines = Vec::new();
    lines.push(format!(
        "Based on a trip to {} for {} days in {}, and a total budget of {} {},",
        query.destination.trim(),
        query.num_days,
        query.travel_month,
        currency.format(query.total_budget),
        currency.code
    ));
    lines.push(format!(
        "provide detailed cost estimates in {} for accommodation, dining, and transportation.",
        currency.code
    ));
    for category in CostCategory::ALL {
        lines.push(format!(
            "For {}, provide estimates for the following types: {}.",
            category.key(),
            catalog.options(category).join(", ")
        ));
    }
    lines.push("Provide average cost ranges rather than absolute values.".to_string());
    lines.push("Respond with a JSON object having the structure (numbers are placeholders):".to_string());
    lines.push(example);
    lines.push(format!(
        "Ensure 'cost' values are numeric (in {}) and 'unit' values are strings.",
        currency.code
    ));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Accommodation, BudgetBreakdown, Dining, Interest, Month, Pace, Transportation,
    };

    fn base() -> crate::types::TripPreferencesBuilder {
        TripPreferences::builder("Kyoto")
            .num_days(4)
            .total_budget(120_000.0)
            .travel_month(Month::April)
            .interest(Interest::Culture)
            .rated_interest(Interest::Food, 5)
            .accommodation(Accommodation::BoutiqueHotel)
            .transportation(Transportation::PublicTransit)
            .dining(Dining::LocalCuisine)
            .pace(Pace::Relaxed)
    }

    #[test]
    fn contains_core_facts_in_lowercase() {
        let prefs = base().companions(Companions::Couple).build().unwrap();
        let prompt = build(&prefs, &GuidanceTables::new());

        assert!(prompt.contains("Kyoto"));
        assert!(prompt.contains("4-day itinerary"));
        assert!(prompt.contains("₹120000"));
        for fragment in ["couple", "boutique hotel", "public transit", "local cuisine", "relaxed"] {
            assert!(prompt.contains(fragment), "missing `{}`", fragment);
        }
        assert!(prompt.contains("Food (importance 5/5), Culture"));
    }

    #[test]
    fn family_clause_only_for_families_with_ages() {
        let couple = base().companions(Companions::Couple).child_ages("4, 9").build().unwrap();
        assert!(!build(&couple, &GuidanceTables::new()).contains("children aged"));

        let family_no_ages = base().companions(Companions::Family).build().unwrap();
        assert!(!build(&family_no_ages, &GuidanceTables::new()).contains("children aged"));

        let family = base().companions(Companions::Family).child_ages("4, 9").build().unwrap();
        assert!(build(&family, &GuidanceTables::new())
            .contains("include activities suitable for children aged 4, 9."));
    }

    #[test]
    fn breakdown_lists_each_category_amount() {
        let prefs = base()
            .budget(Budget::Breakdown(BudgetBreakdown {
                accommodation: 60_000.0,
                activities: 25_000.0,
                dining: 20_000.0,
                transportation: 15_000.0,
            }))
            .build()
            .unwrap();
        let prompt = build(&prefs, &GuidanceTables::new());

        assert!(prompt.contains("- Accommodation: ₹60000"));
        assert!(prompt.contains("- Activities: ₹25000"));
        assert!(prompt.contains("- Dining: ₹20000"));
        assert!(prompt.contains("- Transportation: ₹15000"));
        assert!(prompt.contains("does not exceed ₹120000"));
    }

    #[test]
    fn empty_guidance_omits_clause() {
        let guidance = GuidanceTables::new()
            .with_pace(Pace::Relaxed, "")
            .with_dining(Dining::LocalCuisine, "");
        let prompt = build(&base().build().unwrap(), &guidance);

        assert!(prompt.contains("The overall pace should be relaxed.\n"));
        assert!(!prompt.contains("- For dining:"));
        assert!(prompt.contains("- For transportation:"));
    }

    #[test]
    fn constraints_are_echoed_verbatim() {
        let prefs = base()
            .dietary_restrictions("no pork; <strict> halal")
            .accessibility_needs("wheelchair")
            .special_requests("tea ceremony")
            .nationality("Indian")
            .build()
            .unwrap();
        let prompt = build(&prefs, &GuidanceTables::new());

        assert!(prompt.contains("dietary restrictions (no pork; <strict> halal)"));
        assert!(prompt.contains("accessibility needs (wheelchair)"));
        assert!(prompt.contains("special requests (tea ceremony)"));
        assert!(prompt.contains("unfamiliar to Indian travelers"));
    }

    #[test]
    fn includes_format_instructions() {
        let prompt = build(&base().build().unwrap(), &GuidanceTables::new());
        assert!(prompt.contains("### Day 1"));
        assert!(prompt.contains("#### Morning"));
        assert!(prompt.contains("https://www.google.com/maps/search/?api=1&query="));
        assert!(prompt.contains("summary table in markdown"));
        assert!(prompt.contains("Gelato"));
    }

    #[test]
    fn build_is_deterministic() {
        let prefs = base().companions(Companions::Group).build().unwrap();
        let guidance = GuidanceTables::new();
        assert_eq!(build(&prefs, &guidance), build(&prefs, &guidance));
    }

    #[test]
    fn maps_url_is_form_encoded() {
        assert_eq!(
            maps_search_url("Café de Flore", "Paris"),
            "https://www.google.com/maps/search/?api=1&query=Caf%C3%A9+de+Flore+Paris"
        );
    }

    #[test]
    fn cost_prompt_lists_catalog_and_shape() {
        let query = CostQuery::new("Lisbon", 5, Month::June, 80_000.0);
        let prompt = build_cost_estimate_prompt(&query);

        assert!(prompt.contains("Lisbon for 5 days in June"));
        assert!(prompt.contains("Hotel, Hostel, Vacation rental, Boutique hotel, Eco-lodge"));
        assert!(prompt.contains("\"car rental\""));
        assert!(prompt.contains("\"per km\""));

        let start = prompt.find('{').unwrap();
        let end = prompt.rfind('}').unwrap();
        let example: Value = serde_json::from_str(&prompt[start..=end]).unwrap();
        assert_eq!(example["accommodation"]["hotel"]["unit"], "per night");
    }
}
