use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::classify::DensityTier;

const BASE: &[&str] = &["Parks & Green Spaces"];
const HOT: &[&str] = &["Shopping Malls (indoor)", "Water Fountains", "Cooling Centers"];
const COLD: &[&str] = &["Community Centers", "Recreation Halls"];
const MILD: &[&str] = &["Outdoor Recreation Areas", "Playgrounds"];
const RAIN: &[&str] = &["Underground Drainage System", "Covered Walkways"];
const SNOW: &[&str] = &["Snow Removal Infrastructure"];
const DENSE: &[&str] = &["Public Transit Hubs", "Hospitals", "Schools", "Markets"];

const HOT_ABOVE_C: f64 = 30.0;
const COLD_BELOW_C: f64 = 10.0;

/// Recommended amenity labels, unique and kept in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmenitySet(IndexSet<String>);

impl AmenitySet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<'a> FromIterator<&'a str> for AmenitySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_owned).collect())
    }
}

impl<'a> IntoIterator for &'a AmenitySet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn climate_clause(temperature: f64) -> &'static [&'static str] {
    if temperature > HOT_ABOVE_C {
        HOT
    } else if temperature < COLD_BELOW_C {
        COLD
    } else {
        MILD
    }
}

// Case-sensitive on purpose: "light rain" does not match.
fn weather_clauses(weather: &str) -> impl Iterator<Item = &'static [&'static str]> {
    let rain = (weather.contains("Rain") || weather.contains("Rainy")).then_some(RAIN);
    let snow = weather.contains("Snow").then_some(SNOW);
    rain.into_iter().chain(snow)
}

fn density_clause(tier: DensityTier) -> Option<&'static [&'static str]> {
    tier.is_dense().then_some(DENSE)
}

/// Union of the base set and every clause that fires for the inputs.
pub fn suggest_amenities(temperature: f64, weather: &str, tier: DensityTier) -> AmenitySet {
    std::iter::once(BASE)
        .chain(std::iter::once(climate_clause(temperature)))
        .chain(weather_clauses(weather))
        .chain(density_clause(tier))
        .flat_map(|clause| clause.iter().copied())
        .collect()
}
