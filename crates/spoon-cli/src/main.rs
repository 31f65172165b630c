use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spoon_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "spoon-cli", version, about = "Spoon Tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive tracking session
    Session(commands::session::SessionArgs),
    /// Probe a deployed widget and write a JUnit report
    Health(commands::health::HealthArgs),
    /// Classify a spoon count into an energy level
    Energy(commands::energy::EnergyArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config.log_level);

    let result = match cli.command {
        Commands::Session(args) => commands::session::run(args, config),
        Commands::Health(args) => commands::health::run(args, config),
        Commands::Energy(args) => commands::energy::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
