use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::{input::PlanningInput, output::sanitize};

pub(crate) fn default_population() -> i64 {
    10_000
}

pub(crate) fn default_temperature() -> f64 {
    20.0
}

pub(crate) fn default_weather() -> String {
    "Moderate".to_string()
}

pub(crate) fn default_roads() -> String {
    "Normal".to_string()
}

/// A batch of cities to plan in one run.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub cities: Vec<ScenarioCity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioCity {
    pub name: String,
    pub population: i64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_weather")]
    pub weather: String,
    #[serde(default = "default_roads")]
    pub roads: String,
}

impl ScenarioCity {
    pub fn input(&self) -> PlanningInput {
        PlanningInput::new(
            self.population,
            self.temperature,
            self.weather.clone(),
            self.roads.clone(),
        )
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.cities.is_empty(), "scenario must list at least one city");
        let mut seen = Vec::with_capacity(self.cities.len());
        for city in &self.cities {
            ensure!(!city.name.trim().is_empty(), "city names must not be blank");
            let dir_name = sanitize(&city.name);
            ensure!(
                !seen.contains(&dir_name),
                "city '{}' defined more than once (output directory '{}')",
                city.name,
                dir_name
            );
            ensure!(
                city.population >= 0,
                "city '{}' has negative population {}",
                city.name,
                city.population
            );
            ensure!(
                city.temperature.is_finite(),
                "city '{}' has a non-finite temperature",
                city.name
            );
            seen.push(dir_name);
        }
        Ok(())
    }
}
