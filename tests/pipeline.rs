use cityplan::{
    classify::{DensityTier, RoadWidthTier},
    grid::{GridConfig, ZoneLabel},
    render::Palette,
    Planner, PlannerBuilder, PlannerSettings, PlanningInput,
};

fn reference_planner() -> Planner {
    PlannerBuilder::new(PlannerSettings {
        grid: GridConfig::default(),
        palette: Palette::default(),
    })
    .build()
}

#[test]
fn small_clear_town() {
    let planner = reference_planner();
    let plan = planner.plan(&PlanningInput::new(5_000, 15.0, "Clear", "Normal"));

    assert_eq!(plan.report.density, DensityTier::Low);
    assert_eq!(plan.report.road_width, RoadWidthTier::Narrow);
    assert_eq!(plan.report.road_width.level(), 1);
    for label in [
        "Parks & Green Spaces",
        "Outdoor Recreation Areas",
        "Playgrounds",
    ] {
        assert!(plan.report.amenities.contains(label), "missing {label}");
    }
    assert!(!plan.grid.contains(ZoneLabel::Industrial));
    assert_eq!(plan.grid.get(640, 5), Some(ZoneLabel::Empty));
}

#[test]
fn hot_rainy_metropolis() {
    let planner = reference_planner();
    let plan = planner.plan(&PlanningInput::new(300_000, 35.0, "Rainy", "Heavy"));

    assert_eq!(plan.report.density, DensityTier::VeryHigh);
    assert_eq!(plan.report.road_width.level(), 4);
    for label in [
        "Shopping Malls (indoor)",
        "Underground Drainage System",
        "Public Transit Hubs",
    ] {
        assert!(plan.report.amenities.contains(label), "missing {label}");
    }
    assert!(plan.grid.contains(ZoneLabel::Industrial));
    // row 640 is only on the secondary lattice
    assert_eq!(plan.grid.get(640, 5), Some(ZoneLabel::Road));
    assert_eq!(plan.grid.get(5, 640), Some(ZoneLabel::Road));
}

#[test]
fn identical_inputs_give_identical_results() {
    let planner = reference_planner();
    let input = PlanningInput::new(75_000, 4.0, "Snow", "Normal");
    let first = planner.plan(&input);
    let second = planner.plan(&input);

    assert_eq!(first.grid, second.grid);
    assert!(first.report.same_content(&second.report));
    assert_eq!(first.report.view().amenities, second.report.view().amenities);
}

#[test]
fn roads_descriptor_does_not_change_the_outcome() {
    let planner = reference_planner();
    let light = planner.plan(&PlanningInput::new(60_000, 22.0, "Clear", "Light"));
    let heavy = planner.plan(&PlanningInput::new(60_000, 22.0, "Clear", "Heavy"));
    assert_eq!(light.grid, heavy.grid);
    assert!(light.report.same_content(&heavy.report));
}

#[test]
fn boundary_inputs_do_not_panic() {
    let planner = PlannerBuilder::new(PlannerSettings {
        grid: GridConfig::scaled(64),
        palette: Palette::default(),
    })
    .build();
    for (population, temperature) in [(0, 10.0), (-5, 30.0), (i64::MAX, -273.15)] {
        let plan = planner.plan(&PlanningInput::new(population, temperature, "", ""));
        assert!(plan.report.amenities.contains("Parks & Green Spaces"));
        planner.render(&plan).expect("render succeeds");
    }
}
