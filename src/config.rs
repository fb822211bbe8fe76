//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

/// Deployment environment; `test` keeps everything in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
    Test,
}

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "project-timer")]
#[command(about = "An HTTP service that accrues per-project working time from named timers")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, env = "PORT", default_value = "8082")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// JSON file holding the project records
    #[arg(short, long, env = "TIMER_STORE_PATH", default_value = "./times.json")]
    pub store_path: PathBuf,

    /// Runtime environment
    #[arg(short, long, env = "TIMER_ENV", value_enum, default_value = "development")]
    pub environment: Environment,

    /// Seconds between accrual ticks of a running timer
    #[arg(
        short,
        long,
        env = "TIMER_INTERVAL_SECONDS",
        default_value = "2",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Accrual tick period as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = Config::try_parse_from(["project-timer"]).unwrap();
        assert_eq!(config.interval, 2);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.store_path, PathBuf::from("./times.json"));
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn parses_overrides() {
        let config = Config::try_parse_from([
            "project-timer",
            "--port",
            "9000",
            "--environment",
            "test",
            "--interval",
            "5",
            "-v",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert!(config.address().ends_with(":9000"));
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.tick_interval(), Duration::from_secs(5));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(Config::try_parse_from(["project-timer", "--interval", "0"]).is_err());
    }
}
