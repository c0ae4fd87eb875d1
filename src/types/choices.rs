//! Fixed option catalogs offered to the traveler.
//!
//! Every catalog is a closed enum with a display label. The lowercase label is
//! what ends up inside prompts, and parsing accepts the label in any case with
//! spaces, dashes or underscores (`"eco-lodge"`, `"EcoLodge"`, `"eco_lodge"`).

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Error returned when a string is not a member of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {catalog} `{value}` (expected one of: {expected})")]
pub struct UnknownChoice {
    pub catalog: &'static str,
    pub value: String,
    pub expected: String,
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $catalog:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label shown to the traveler.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Lowercase form interpolated into prompts.
            pub fn prompt_form(self) -> String {
                self.label().to_lowercase()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(value);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|choice| normalize(choice.label()) == wanted)
                    .ok_or_else(|| UnknownChoice {
                        catalog: $catalog,
                        value: value.to_string(),
                        expected: $name::ALL
                            .iter()
                            .map(|choice| choice.label())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

choice_enum!(
    /// Who is travelling.
    Companions, "companions" {
        Solo => "Solo",
        Couple => "Couple",
        Family => "Family",
        Group => "Group",
    }
);

choice_enum!(
    Interest, "interest" {
        Art => "Art",
        History => "History",
        Food => "Food",
        Adventure => "Adventure",
        Relaxation => "Relaxation",
        Culture => "Culture",
        Shopping => "Shopping",
    }
);

choice_enum!(
    Accommodation, "accommodation" {
        Hotel => "Hotel",
        Hostel => "Hostel",
        VacationRental => "Vacation rental",
        BoutiqueHotel => "Boutique hotel",
        EcoLodge => "Eco-lodge",
    }
);

choice_enum!(
    Transportation, "transportation" {
        PublicTransit => "Public transit",
        RentalCar => "Rental car",
        Walking => "Walking",
        Cycling => "Cycling",
        Taxi => "Taxi",
    }
);

choice_enum!(
    Dining, "dining" {
        StreetFood => "Street food",
        CasualDining => "Casual dining",
        FineDining => "Fine dining",
        LocalCuisine => "Local cuisine",
        InternationalCuisine => "International cuisine",
    }
);

choice_enum!(
    /// How full each day should be.
    Pace, "pace" {
        Relaxed => "Relaxed",
        Moderate => "Moderate",
        Packed => "Packed",
    }
);

choice_enum!(
    Month, "month" {
        January => "January",
        February => "February",
        March => "March",
        April => "April",
        May => "May",
        June => "June",
        July => "July",
        August => "August",
        September => "September",
        October => "October",
        November => "November",
        December => "December",
    }
);
