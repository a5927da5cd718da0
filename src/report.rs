use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{
    amenities::AmenitySet,
    classify::{DensityTier, RoadWidthTier},
    input::PlanningInput,
};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn road_description(width: RoadWidthTier) -> &'static str {
    match width {
        RoadWidthTier::Narrow => {
            "Narrow roads suitable for low-traffic areas. Good for pedestrian-friendly communities."
        }
        RoadWidthTier::Medium => {
            "Medium-width roads for local traffic. Balanced between vehicle and pedestrian needs."
        }
        RoadWidthTier::Wide => {
            "Wider roads with multiple lanes. Designed for higher traffic volume and faster commute."
        }
        RoadWidthTier::VeryWide => {
            "Very wide roads (highways/motorways). Essential for metropolitan areas with heavy traffic."
        }
    }
}

pub fn recommendations(tier: DensityTier) -> &'static [&'static str] {
    match tier {
        DensityTier::Low => &[
            "Plan for agricultural areas and conservation zones",
            "Focus on community centers and local markets",
        ],
        DensityTier::Medium => &[
            "Balance between commercial and residential development",
            "Invest in local public transportation",
        ],
        DensityTier::High => &[
            "Implement multi-level parking structures",
            "Develop rapid transit systems (metro/buses)",
            "Maximize vertical development (high-rises)",
        ],
        DensityTier::VeryHigh => &[
            "Implement advanced smart city infrastructure",
            "Develop comprehensive public transportation network",
            "Plan mixed-use developments",
        ],
    }
}

/// Read-only outcome of one planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub population: i64,
    pub density: DensityTier,
    pub temperature: f64,
    pub weather: String,
    pub road_width: RoadWidthTier,
    pub road_description: String,
    pub amenities: AmenitySet,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Local>,
}

impl Report {
    pub fn view(&self) -> ReportView {
        ReportView::from(self)
    }

    /// Equality on everything but the timestamp.
    pub fn same_content(&self, other: &Report) -> bool {
        Report {
            generated_at: other.generated_at,
            ..self.clone()
        } == *other
    }
}

pub fn compose_report(
    input: &PlanningInput,
    density: DensityTier,
    road_width: RoadWidthTier,
    amenities: AmenitySet,
) -> Report {
    compose_report_at(input, density, road_width, amenities, Local::now())
}

pub fn compose_report_at(
    input: &PlanningInput,
    density: DensityTier,
    road_width: RoadWidthTier,
    amenities: AmenitySet,
    generated_at: DateTime<Local>,
) -> Report {
    Report {
        population: input.population(),
        density,
        temperature: input.temperature(),
        weather: input.weather().to_string(),
        road_width,
        road_description: road_description(road_width).to_string(),
        amenities,
        recommendations: recommendations(density)
            .iter()
            .map(|line| line.to_string())
            .collect(),
        generated_at,
    }
}

/// Human-readable rendering of a [`Report`], the shape served to the web page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub population: String,
    pub density: String,
    pub temperature: String,
    pub weather: String,
    pub road_width: String,
    pub road_description: String,
    pub amenities: Vec<String>,
    pub recommendations: Vec<String>,
    pub timestamp: String,
}

impl From<&Report> for ReportView {
    fn from(report: &Report) -> Self {
        Self {
            population: format_population(report.population),
            density: report.density.label().to_string(),
            temperature: format!("{}°C", format_temperature(report.temperature)),
            weather: report.weather.clone(),
            road_width: format!(
                "Width Level: {}/{}",
                report.road_width.level(),
                RoadWidthTier::MAX_LEVEL
            ),
            road_description: report.road_description.clone(),
            amenities: report.amenities.to_vec(),
            recommendations: report.recommendations.clone(),
            timestamp: report.generated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "City Layout Report ({})", self.timestamp)?;
        writeln!(f, "  Population:   {}", self.population)?;
        writeln!(f, "  Density:      {}", self.density)?;
        writeln!(f, "  Temperature:  {}", self.temperature)?;
        writeln!(f, "  Weather:      {}", self.weather)?;
        writeln!(f, "  Roads:        {}", self.road_width)?;
        writeln!(f, "                {}", self.road_description)?;
        writeln!(f, "  Amenities:")?;
        for amenity in &self.amenities {
            writeln!(f, "    - {amenity}")?;
        }
        writeln!(f, "  Recommendations:")?;
        for line in &self.recommendations {
            writeln!(f, "    - {line}")?;
        }
        Ok(())
    }
}

/// `1234567` -> `"1,234,567"`.
/// Whole degrees keep one decimal place ("35.0"), others print as-is ("-2.5").
fn format_temperature(celsius: f64) -> String {
    if celsius.is_finite() && celsius.fract() == 0.0 {
        format!("{celsius:.1}")
    } else {
        celsius.to_string()
    }
}

pub fn format_population(population: i64) -> String {
    let digits = population.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if population < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::amenities::suggest_amenities;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn every_tier_has_recommendations() {
        for tier in DensityTier::ALL {
            let lines = recommendations(tier);
            assert!(lines.len() >= 2, "{tier} has too few recommendations");
        }
        assert_eq!(recommendations(DensityTier::High).len(), 3);
    }

    #[test]
    fn report_copies_inputs_and_lookups() {
        let input = PlanningInput::new(75_000, 22.5, "Sunny", "Normal");
        let amenities = suggest_amenities(22.5, "Sunny", DensityTier::High);
        let report = compose_report_at(
            &input,
            DensityTier::High,
            RoadWidthTier::Wide,
            amenities.clone(),
            fixed_time(),
        );
        assert_eq!(report.population, 75_000);
        assert_eq!(report.weather, "Sunny");
        assert_eq!(report.amenities, amenities);
        assert!(report.road_description.starts_with("Wider roads"));
        assert_eq!(
            report.recommendations[1],
            "Develop rapid transit systems (metro/buses)"
        );
    }

    #[test]
    fn view_formats_for_humans() {
        let input = PlanningInput::new(300_000, 35.0, "Rainy", "Heavy");
        let report = compose_report_at(
            &input,
            DensityTier::VeryHigh,
            RoadWidthTier::VeryWide,
            AmenitySet::default(),
            fixed_time(),
        );
        let view = report.view();
        assert_eq!(view.population, "300,000");
        assert_eq!(view.density, "Very High");
        assert_eq!(view.temperature, "35.0°C");
        assert_eq!(view.road_width, "Width Level: 4/4");
        assert_eq!(view.timestamp, "2024-03-09 14:05:00");
        let text = view.to_string();
        assert!(text.contains("Plan mixed-use developments"));
    }

    #[test]
    fn temperatures_keep_a_decimal_place() {
        assert_eq!(format_temperature(35.0), "35.0");
        assert_eq!(format_temperature(-4.0), "-4.0");
        assert_eq!(format_temperature(21.5), "21.5");
        assert_eq!(format_temperature(-0.25), "-0.25");
    }

    #[test]
    fn same_content_ignores_timestamp() {
        let input = PlanningInput::new(5_000, 15.0, "Clear", "Normal");
        let a = compose_report(
            &input,
            DensityTier::Low,
            RoadWidthTier::Narrow,
            AmenitySet::default(),
        );
        let b = compose_report_at(
            &input,
            DensityTier::Low,
            RoadWidthTier::Narrow,
            AmenitySet::default(),
            fixed_time(),
        );
        assert!(a.same_content(&b));
        let c = compose_report_at(
            &input,
            DensityTier::Medium,
            RoadWidthTier::Medium,
            AmenitySet::default(),
            fixed_time(),
        );
        assert!(!b.same_content(&c));
    }

    #[test]
    fn population_grouping() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1_000), "1,000");
        assert_eq!(format_population(1_234_567), "1,234,567");
        assert_eq!(format_population(-45_000), "-45,000");
    }
}
