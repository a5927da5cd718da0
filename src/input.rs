use serde::{Deserialize, Serialize};

/// The four planning inputs. Validated by the caller before they get here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningInput {
    population: i64,
    temperature: f64,
    weather: String,
    #[serde(alias = "roads")]
    roads_descriptor: String,
}

impl PlanningInput {
    pub fn new(
        population: i64,
        temperature: f64,
        weather: impl Into<String>,
        roads_descriptor: impl Into<String>,
    ) -> Self {
        Self {
            population,
            temperature,
            weather: weather.into(),
            roads_descriptor: roads_descriptor.into(),
        }
    }

    pub fn population(&self) -> i64 {
        self.population
    }

    /// Degrees Celsius.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn weather(&self) -> &str {
        &self.weather
    }

    /// Accepted and carried through, but no rule reads it yet.
    pub fn roads_descriptor(&self) -> &str {
        &self.roads_descriptor
    }
}
