//! ICN Interest/Data exchange simulator

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use icn_logging::{IcnSubscriberBuilder, LogConfig};
use tracing::info;

use icn_simulation::{ScenarioConfig, Simulation};

#[derive(Parser)]
#[command(
    name = "icn-sim",
    about = "Two-node Interest/Data exchange simulation",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a consumer and a producer over one link
    Run {
        /// Scenario file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the simulated duration
        #[arg(short, long)]
        duration_ms: Option<u64>,

        /// Print the final statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default scenario as TOML
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::development()
    } else {
        LogConfig {
            console: icn_logging::ConsoleConfig {
                pretty: true,
                ..Default::default()
            },
            ..Default::default()
        }
    };
    let _guard = IcnSubscriberBuilder::new().with_config(log_config).init()?;

    match cli.command {
        Commands::Run {
            config,
            duration_ms,
            json,
        } => {
            let mut scenario = ScenarioConfig::load(config.as_deref())?;
            if let Some(ms) = duration_ms {
                scenario.duration_ms = ms;
            }
            run(&scenario, json)?;
        }
        Commands::DefaultConfig => {
            print!("{}", toml::to_string_pretty(&ScenarioConfig::default())?);
        }
    }

    Ok(())
}

fn run(scenario: &ScenarioConfig, json: bool) -> anyhow::Result<()> {
    let mut sim = Simulation::two_node(
        scenario.consumer_config(),
        scenario.producer_config(),
        scenario.link_delay(),
    )?;
    info!(
        consumer = %scenario.consumer.interest_name,
        producer = %scenario.producer.prefix,
        link_delay_ms = scenario.link_delay_ms,
        "Two-node scenario ready"
    );

    let stats = sim.run_until(scenario.duration());

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Simulated time:     {}", sim.now());
    println!("Interests sent:     {}", stats.interests_sent);
    println!("Interests received: {}", stats.interests_received);
    println!("Data sent:          {}", stats.data_sent);
    println!("Data received:      {}", stats.data_received);
    println!("Timeouts:           {}", stats.timeouts);
    println!("Interests dropped:  {}", stats.interests_dropped);
    println!("Data dropped:       {}", stats.data_dropped);
    println!("Satisfaction:       {:.1}%", stats.satisfaction_ratio() * 100.0);
    match stats.mean_rtt() {
        Some(rtt) => println!("Mean RTT:           {:?}", rtt),
        None => println!("Mean RTT:           n/a"),
    }
    Ok(())
}
