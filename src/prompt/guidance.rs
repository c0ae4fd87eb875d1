//! Descriptive clauses attached to preference values.
//!
//! Each `default_*` function is total over its enum, so every value has a
//! known description. [`GuidanceTables`] layers optional overrides on top;
//! an override set to the empty string suppresses the clause entirely.

use std::collections::BTreeMap;

use crate::types::{Companions, Dining, Pace, Transportation};

pub fn default_pace(pace: Pace) -> &'static str {
    match pace {
        Pace::Relaxed => "plenty of downtime, no more than two main activities per day and late starts",
        Pace::Moderate => "a balanced pace with two or three activities per day and time to rest in between",
        Pace::Packed => "a full schedule from early morning to evening, fitting in as many highlights as possible",
    }
}

pub fn default_companions(companions: Companions) -> &'static str {
    match companions {
        Companions::Solo => "suggest safe, social spots and activities that are easy to join alone",
        Companions::Couple => "include romantic settings, scenic viewpoints and dinners for two",
        Companions::Family => "favour kid-friendly attractions, short transfers and regular breaks",
        Companions::Group => "prefer venues that take group bookings and activities that can be shared",
    }
}

pub fn default_transportation(transportation: Transportation) -> &'static str {
    match transportation {
        Transportation::PublicTransit => "route activities along metro, bus or tram lines and mention passes or day tickets",
        Transportation::RentalCar => "include parking options and scenic drives, and keep driving times reasonable",
        Transportation::Walking => "cluster activities by neighbourhood so that they are within walking distance",
        Transportation::Cycling => "suggest bike-friendly routes, rental points and places to park bicycles",
        Transportation::Taxi => "group nearby stops to keep taxi rides short and mention ride-hailing availability",
    }
}

pub fn default_dining(dining: Dining) -> &'static str {
    match dining {
        Dining::StreetFood => "highlight well-known street food stalls, night markets and food streets",
        Dining::CasualDining => "recommend relaxed local restaurants and cafes with good value",
        Dining::FineDining => "include acclaimed restaurants and note where reservations are needed",
        Dining::LocalCuisine => "focus on traditional dishes and the places locals eat them",
        Dining::InternationalCuisine => "include restaurants offering familiar international dishes alongside local options",
    }
}

/// Guidance lookups used by the prompt builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuidanceTables {
    pace: BTreeMap<Pace, String>,
    companions: BTreeMap<Companions, String>,
    transportation: BTreeMap<Transportation, String>,
    dining: BTreeMap<Dining, String>,
}

impl GuidanceTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pace(mut self, pace: Pace, description: impl Into<String>) -> Self {
        self.pace.insert(pace, description.into());
        self
    }

    pub fn with_companions(mut self, companions: Companions, description: impl Into<String>) -> Self {
        self.companions.insert(companions, description.into());
        self
    }

    pub fn with_transportation(
        mut self,
        transportation: Transportation,
        description: impl Into<String>,
    ) -> Self {
        self.transportation.insert(transportation, description.into());
        self
    }

    pub fn with_dining(mut self, dining: Dining, description: impl Into<String>) -> Self {
        self.dining.insert(dining, description.into());
        self
    }

    pub fn pace(&self, pace: Pace) -> &str {
        self.pace
            .get(&pace)
            .map(String::as_str)
            .unwrap_or_else(|| default_pace(pace))
    }

    pub fn companions(&self, companions: Companions) -> &str {
        self.companions
            .get(&companions)
            .map(String::as_str)
            .unwrap_or_else(|| default_companions(companions))
    }

    pub fn transportation(&self, transportation: Transportation) -> &str {
        self.transportation
            .get(&transportation)
            .map(String::as_str)
            .unwrap_or_else(|| default_transportation(transportation))
    }

    pub fn dining(&self, dining: Dining) -> &str {
        self.dining
            .get(&dining)
            .map(String::as_str)
            .unwrap_or_else(|| default_dining(dining))
    }
}
