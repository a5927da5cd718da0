use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MEDIUM_THRESHOLD: i64 = 10_000;
const HIGH_THRESHOLD: i64 = 50_000;
const VERY_HIGH_THRESHOLD: i64 = 200_000;

/// Population-size bucket that drives every downstream rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DensityTier {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl DensityTier {
    pub const ALL: [DensityTier; 4] = [
        DensityTier::Low,
        DensityTier::Medium,
        DensityTier::High,
        DensityTier::VeryHigh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DensityTier::Low => "Low",
            DensityTier::Medium => "Medium",
            DensityTier::High => "High",
            DensityTier::VeryHigh => "Very High",
        }
    }

    /// High and very high density unlock transit amenities, the secondary
    /// road lattice and the industrial zone.
    pub fn is_dense(self) -> bool {
        matches!(self, DensityTier::High | DensityTier::VeryHigh)
    }
}

impl fmt::Display for DensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RoadWidthTier {
    Narrow,
    Medium,
    Wide,
    VeryWide,
}

impl RoadWidthTier {
    pub const MAX_LEVEL: u8 = 4;

    pub fn level(self) -> u8 {
        match self {
            RoadWidthTier::Narrow => 1,
            RoadWidthTier::Medium => 2,
            RoadWidthTier::Wide => 3,
            RoadWidthTier::VeryWide => 4,
        }
    }
}

impl fmt::Display for RoadWidthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("road width level must be between 1 and 4, got {0}")]
pub struct TierError(pub u8);

impl TryFrom<u8> for RoadWidthTier {
    type Error = TierError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(RoadWidthTier::Narrow),
            2 => Ok(RoadWidthTier::Medium),
            3 => Ok(RoadWidthTier::Wide),
            4 => Ok(RoadWidthTier::VeryWide),
            other => Err(TierError(other)),
        }
    }
}

impl From<RoadWidthTier> for u8 {
    fn from(value: RoadWidthTier) -> Self {
        value.level()
    }
}

/// Half-open buckets: [0, 10k) Low, [10k, 50k) Medium, [50k, 200k) High,
/// [200k, inf) Very High. Non-positive populations fall into Low.
pub fn classify_density(population: i64) -> DensityTier {
    if population < MEDIUM_THRESHOLD {
        DensityTier::Low
    } else if population < HIGH_THRESHOLD {
        DensityTier::Medium
    } else if population < VERY_HIGH_THRESHOLD {
        DensityTier::High
    } else {
        DensityTier::VeryHigh
    }
}

pub fn determine_road_width(tier: DensityTier) -> RoadWidthTier {
    match tier {
        DensityTier::Low => RoadWidthTier::Narrow,
        DensityTier::Medium => RoadWidthTier::Medium,
        DensityTier::High => RoadWidthTier::Wide,
        DensityTier::VeryHigh => RoadWidthTier::VeryWide,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_land_on_documented_sides() {
        let cases = [
            (0, DensityTier::Low),
            (9_999, DensityTier::Low),
            (10_000, DensityTier::Medium),
            (49_999, DensityTier::Medium),
            (50_000, DensityTier::High),
            (199_999, DensityTier::High),
            (200_000, DensityTier::VeryHigh),
            (i64::MAX, DensityTier::VeryHigh),
        ];
        for (population, expected) in cases {
            assert_eq!(classify_density(population), expected, "population {population}");
        }
    }

    #[test]
    fn negative_population_is_low() {
        assert_eq!(classify_density(-1), DensityTier::Low);
        assert_eq!(classify_density(i64::MIN), DensityTier::Low);
    }

    #[test]
    fn density_is_monotonic() {
        let mut previous = classify_density(0);
        for population in (0..400_000).step_by(250) {
            let tier = classify_density(population);
            assert!(tier >= previous, "tier dropped at {population}");
            previous = tier;
        }
    }

    #[test]
    fn road_width_is_a_bijection() {
        let levels: Vec<u8> = DensityTier::ALL
            .iter()
            .map(|tier| determine_road_width(*tier).level())
            .collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
        for level in 1..=RoadWidthTier::MAX_LEVEL {
            let width = RoadWidthTier::try_from(level).unwrap();
            assert_eq!(width.level(), level);
        }
        assert_eq!(RoadWidthTier::try_from(0), Err(TierError(0)));
        assert_eq!(RoadWidthTier::try_from(5), Err(TierError(5)));
    }

    #[test]
    fn very_high_serializes_with_space() {
        let json = serde_json::to_string(&DensityTier::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
        let width = serde_json::to_string(&RoadWidthTier::Wide).unwrap();
        assert_eq!(width, "3");
    }
}
