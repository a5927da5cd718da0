use tracing::debug;

use crate::{
    amenities::{suggest_amenities, AmenitySet},
    classify::{classify_density, determine_road_width, DensityTier, RoadWidthTier},
    config::PlannerConfig,
    grid::{synthesize_grid, GridConfig, ZoneGrid},
    input::PlanningInput,
    render::{Palette, PngRenderer, RenderError, RenderedImage, Renderer},
    report::{compose_report, format_population, Report},
};

pub struct PlannerSettings {
    pub grid: GridConfig,
    pub palette: Palette,
}

impl From<&PlannerConfig> for PlannerSettings {
    fn from(config: &PlannerConfig) -> Self {
        Self {
            grid: config.grid.clone(),
            palette: config.palette.clone(),
        }
    }
}

pub struct PlannerBuilder {
    settings: PlannerSettings,
    renderer: Option<Box<dyn Renderer>>,
}

impl PlannerBuilder {
    pub fn new(settings: PlannerSettings) -> Self {
        Self {
            settings,
            renderer: None,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(PlannerSettings::from(config))
            .with_renderer(PngRenderer::new(config.render.clone()))
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn build(self) -> Planner {
        Planner {
            renderer: self
                .renderer
                .unwrap_or_else(|| Box::new(PngRenderer::default())),
            settings: self.settings,
        }
    }
}

/// Classification outcome without grid or report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Assessment {
    pub density: DensityTier,
    pub road_width: RoadWidthTier,
    pub amenities: AmenitySet,
}

#[derive(Debug, Clone)]
pub struct Plan {
    pub input: PlanningInput,
    pub report: Report,
    pub grid: ZoneGrid,
}

impl Plan {
    pub fn title(&self) -> String {
        layout_title(self.input.population(), self.report.density)
    }
}

pub fn layout_title(population: i64, density: DensityTier) -> String {
    format!(
        "AI-Generated City Layout\nPopulation: {} | Density: {}",
        format_population(population),
        density
    )
}

/// Runs the derivation pipeline. Holds only immutable configuration, so a
/// single instance can serve concurrent requests.
pub struct Planner {
    renderer: Box<dyn Renderer>,
    settings: PlannerSettings,
}

impl Planner {
    pub fn assess(&self, input: &PlanningInput) -> Assessment {
        let density = classify_density(input.population());
        Assessment {
            density,
            road_width: determine_road_width(density),
            amenities: suggest_amenities(input.temperature(), input.weather(), density),
        }
    }

    pub fn plan(&self, input: &PlanningInput) -> Plan {
        let Assessment {
            density,
            road_width,
            amenities,
        } = self.assess(input);
        debug!(
            population = input.population(),
            %density,
            road_width = road_width.level(),
            amenities = amenities.len(),
            roads = input.roads_descriptor(),
            "classified planning input"
        );
        let grid = synthesize_grid(density, &self.settings.grid);
        let report = compose_report(input, density, road_width, amenities);
        Plan {
            input: input.clone(),
            report,
            grid,
        }
    }

    pub fn render(&self, plan: &Plan) -> Result<RenderedImage, RenderError> {
        let image = self
            .renderer
            .render(&plan.grid, &self.settings.palette, &plan.title())?;
        debug!(
            width = image.width,
            height = image.height,
            bytes = image.bytes.len(),
            "rendered layout"
        );
        Ok(image)
    }

    pub fn grid_config(&self) -> &GridConfig {
        &self.settings.grid
    }

    pub fn palette(&self) -> &Palette {
        &self.settings.palette
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::grid::ZoneLabel;

    struct CountingRenderer {
        calls: Arc<AtomicUsize>,
    }

    impl Renderer for CountingRenderer {
        fn render(
            &self,
            grid: &ZoneGrid,
            _palette: &Palette,
            title: &str,
        ) -> Result<RenderedImage, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(RenderedImage {
                title: title.to_string(),
                mime_type: "application/octet-stream",
                width: grid.size() as u32,
                height: grid.size() as u32,
                bytes: Vec::new(),
            })
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&self, _: &ZoneGrid, _: &Palette, _: &str) -> Result<RenderedImage, RenderError> {
            Err(RenderError::EmptyGrid)
        }
    }

    fn small_settings() -> PlannerSettings {
        PlannerSettings {
            grid: GridConfig::scaled(60),
            palette: Palette::default(),
        }
    }

    #[test]
    fn plan_uses_configured_grid() {
        let planner = PlannerBuilder::new(small_settings()).build();
        let plan = planner.plan(&PlanningInput::new(120_000, 18.0, "Clear", "Normal"));
        assert_eq!(plan.grid.size(), 60);
        assert_eq!(plan.report.density, DensityTier::High);
        assert!(plan.grid.contains(ZoneLabel::Industrial));
    }

    #[test]
    fn custom_renderer_receives_title() {
        let calls = Arc::new(AtomicUsize::new(0));
        let planner = PlannerBuilder::new(small_settings())
            .with_renderer(CountingRenderer {
                calls: calls.clone(),
            })
            .build();
        let plan = planner.plan(&PlanningInput::new(300_000, 35.0, "Rainy", "Heavy"));
        let image = planner.render(&plan).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            image.title,
            "AI-Generated City Layout\nPopulation: 300,000 | Density: Very High"
        );
    }

    #[test]
    fn renderer_failure_is_surfaced() {
        let planner = PlannerBuilder::new(small_settings())
            .with_renderer(FailingRenderer)
            .build();
        let plan = planner.plan(&PlanningInput::new(10, 20.0, "Clear", "Normal"));
        assert!(matches!(planner.render(&plan), Err(RenderError::EmptyGrid)));
    }

    #[test]
    fn assessment_matches_plan() {
        let planner = PlannerBuilder::new(small_settings()).build();
        let input = PlanningInput::new(20_000, 5.0, "Snow", "Normal");
        let assessment = planner.assess(&input);
        let plan = planner.plan(&input);
        assert_eq!(assessment.density, plan.report.density);
        assert_eq!(assessment.road_width, plan.report.road_width);
        assert_eq!(assessment.amenities, plan.report.amenities);
        assert!(assessment.amenities.contains("Snow Removal Infrastructure"));
    }
}
