pub mod amenities;
pub mod classify;
pub mod config;
pub mod grid;
pub mod input;
pub mod output;
pub mod planner;
pub mod render;
pub mod report;
pub mod scenario;
pub mod web;

pub use config::PlannerConfig;
pub use input::PlanningInput;
pub use planner::{Assessment, Plan, Planner, PlannerBuilder, PlannerSettings};
