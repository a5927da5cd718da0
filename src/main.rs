use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cityplan::{
    output::LayoutWriter,
    scenario::ScenarioLoader,
    web::{self, WebServerConfig},
    PlannerBuilder, PlannerConfig, PlanningInput,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Rule-based city layout planner")]
struct Cli {
    /// Planner configuration YAML (grid, palette, render, logging, server)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a single city and print its report
    Plan {
        #[arg(long)]
        population: i64,
        /// Average temperature in degrees Celsius
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        #[arg(long)]
        weather: String,
        #[arg(long, default_value = "Normal")]
        roads: String,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Also write report.json and layout.png under this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Plan every city listed in a scenario YAML file
    Batch {
        #[arg(long)]
        scenario: PathBuf,
        #[arg(long, default_value = "layouts")]
        output_dir: PathBuf,
    },
    /// Serve the planner page and JSON API
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
    Yaml,
}

fn load_config(path: Option<&PathBuf>) -> Result<PlannerConfig> {
    match path {
        Some(path) => PlannerConfig::from_yaml(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(PlannerConfig::default()),
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing(&config.logging.level);

    match cli.command {
        Command::Plan {
            population,
            temperature,
            weather,
            roads,
            format,
            output_dir,
        } => {
            let planner = PlannerBuilder::from_config(&config).build();
            let input = PlanningInput::new(population, temperature, weather, roads);
            let plan = planner.plan(&input);
            let view = plan.report.view();
            match format {
                ReportFormat::Text => print!("{view}"),
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                ReportFormat::Yaml => print!("{}", serde_yaml::to_string(&view)?),
            }
            if let Some(dir) = output_dir {
                let image = planner.render(&plan)?;
                LayoutWriter::new(dir).write("layout", &plan.report, &image)?;
            }
        }
        Command::Batch {
            scenario,
            output_dir,
        } => {
            let scenario = ScenarioLoader::new(".").load(&scenario)?;
            let planner = PlannerBuilder::from_config(&config).build();
            let writer = LayoutWriter::new(&output_dir).scoped(&scenario.name);
            for city in &scenario.cities {
                let plan = planner.plan(&city.input());
                let image = planner
                    .render(&plan)
                    .with_context(|| format!("Failed to render city '{}'", city.name))?;
                writer.write(&city.name, &plan.report, &image)?;
                info!(
                    city = %city.name,
                    density = %plan.report.density,
                    road_width = plan.report.road_width.level(),
                    "planned city"
                );
            }
            println!(
                "Scenario '{}' planned {} cities into {}",
                scenario.name,
                scenario.cities.len(),
                output_dir.display()
            );
        }
        Command::Serve { host, port } => {
            let server = config.server.clone();
            web::run(WebServerConfig {
                host: host.unwrap_or(server.host),
                port: port.unwrap_or(server.port),
                planner: config,
            })
            .await?;
        }
    }
    Ok(())
}
