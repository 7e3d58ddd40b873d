mod arbitrage;
mod config;
mod domain;
mod exchanges;
mod scanner;

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use config::Config;
use exchanges::bitvavo::BitvavoExchange;
use scanner::Scanner;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = parse_config_path();

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.app.log_level.as_deref());

    let exchange = match BitvavoExchange::from_config(&config) {
        Ok(exchange) => Arc::new(exchange),
        Err(e) => {
            error!(error = %e, "Failed to create exchange source");
            return ExitCode::FAILURE;
        }
    };

    let scanner = match Scanner::from_config(&config, exchange) {
        Ok(scanner) => scanner,
        Err(e) => {
            error!(error = %e, "Failed to create scanner");
            return ExitCode::FAILURE;
        }
    };

    info!(app = %config.app.name, env = %config.app.env, config = %config_path, "Scanner initialized");

    scanner.log_balances().await;

    let outcome = match scanner.scan().await {
        Ok(report) => {
            match report.opportunities.first() {
                Some(top) => info!(
                    opportunities = report.opportunities.len(),
                    top_cycle = %top.cycle,
                    top_direction = %top.direction,
                    top_profit_percent = %top.profit_percent().round_dp(4),
                    "Opportunities above threshold"
                ),
                None => info!(
                    best_rate = ?report.best_rate,
                    "No opportunities above threshold"
                ),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Scan failed");
            ExitCode::FAILURE
        }
    };

    let stats = scanner.stats().await;
    info!(
        scans = stats.scans,
        failed_scans = stats.failed_scans,
        cycles_evaluated = stats.cycles_evaluated,
        opportunities_detected = stats.opportunities_detected,
        best_rate = ?stats.best_rate,
        "Scanner stats"
    );

    outcome
}
