//! Health check command for deployed instances.

use clap::Args;
use std::path::PathBuf;

use spoon_core::health::HEALTH_CHECK_URL_ENV;
use spoon_core::{CheckStatus, Config, HealthProbe};

#[derive(Args)]
pub struct HealthArgs {
    /// Base URL of the deployment (falls back to HEALTH_CHECK_URL, then config)
    #[arg(env = HEALTH_CHECK_URL_ENV)]
    url: Option<String>,
    /// JUnit XML output path (default from config)
    #[arg(long)]
    junit: Option<PathBuf>,
    /// Skip writing the JUnit report
    #[arg(long, conflicts_with = "junit")]
    no_junit: bool,
    /// Expected page title
    #[arg(long)]
    title: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

pub fn run(args: HealthArgs, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let url = args
        .url
        .or_else(|| config.health.url.clone())
        .filter(|u| !u.trim().is_empty())
        .ok_or("no URL given (pass one, set HEALTH_CHECK_URL, or `config set health.url`)")?;

    let mut health = config.health.clone();
    if let Some(title) = args.title {
        health.title = title;
    }
    if let Some(timeout) = args.timeout {
        health.timeout_secs = timeout;
    }
    let probe = HealthProbe::from_config(&url, &health)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(probe.run());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for result in &report.results {
            let mark = match result.status {
                CheckStatus::Pass => "ok  ",
                CheckStatus::Fail => "FAIL",
                CheckStatus::Warn => "warn",
            };
            println!("[{mark}] {}: {}", result.name, result.details);
        }
        println!();
        print!("{}", report.summary());
    }

    if !args.no_junit {
        let path = args
            .junit
            .unwrap_or_else(|| PathBuf::from(&health.junit_path));
        report.write_junit(&path)?;
        if !args.json {
            println!("\nJUnit results written to {}", path.display());
        }
    }

    if report.is_healthy() {
        Ok(())
    } else {
        Err(format!("health check failed: {} failing check(s)", report.failed()).into())
    }
}
