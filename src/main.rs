use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use cerrado::{
    engine::{Engine, EngineSettings},
    scenario::ScenarioLoader,
    web,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "cerrado grid ecosystem simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/riverlands.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Serve the live web UI instead of running headless
    #[arg(long)]
    serve: bool,

    /// Web UI bind host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Web UI bind port
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    if cli.serve {
        let config = web::WebServerConfig {
            scenario,
            ticks,
            snapshot_interval,
            snapshot_dir,
            host: cli.host,
            port: cli.port,
        };
        return tokio::runtime::Runtime::new()?.block_on(web::run(config));
    }

    let settings = EngineSettings::from_scenario(&scenario)
        .with_snapshot_interval(snapshot_interval)
        .with_snapshot_dir(snapshot_dir);
    let mut engine = Engine::new(&scenario, settings);

    let mut last_frame = None;
    engine.run_with_hook(ticks, |frame| last_frame = Some(frame))?;

    match last_frame {
        Some(frame) => {
            let breakdown = frame
                .population
                .iter()
                .map(|(species, count)| format!("{} {}", species.name(), count))
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "Scenario '{}' finished at tick {} with {} animals ({}).",
                scenario.name,
                frame.tick,
                engine.total_population(),
                breakdown
            );
            if !frame.viable {
                println!("The ecosystem collapsed: fewer than two species survive.");
            }
        }
        None => println!("Scenario '{}' ran for zero ticks.", scenario.name),
    }
    Ok(())
}
