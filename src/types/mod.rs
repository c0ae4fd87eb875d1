pub mod choices;
pub mod cost_estimate;
pub mod itinerary;
pub mod preferences;

pub use choices::{
    Accommodation, Companions, Dining, Interest, Month, Pace, Transportation, UnknownChoice,
};
pub use cost_estimate::{
    cost_key, decorate, CostCategory, CostEstimate, CostQuery, CostRange, OptionCatalog,
    OptionCost,
};
pub use itinerary::Itinerary;
pub use preferences::{
    Budget, BudgetBreakdown, Currency, InterestChoice, TripPreferences, TripPreferencesBuilder,
};
