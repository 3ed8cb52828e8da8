//! Email Classifier - terminal client for the email classification API
//!
//! Collects an email body (typed text or a file), sends it to the API and
//! shows the category, confidence and suggested reply.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classifier_core::AppConfig;
use std::path::PathBuf;
use tracing::info;

mod clipboard;
mod commands;
mod logging;
mod ui;

use commands::OutputFormat;
use logging::{LogConfig, LogTarget};

#[derive(Parser)]
#[command(name = "email-classifier")]
#[command(version, about = "Classify emails as productive or unproductive")]
struct Cli {
    /// Config file (default: <config_dir>/email-classifier/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, e.g. https://host/api/v1
    #[arg(long, global = true, env = "EMAIL_CLASSIFIER_API_URL")]
    api_url: Option<String>,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal UI (default)
    Tui,

    /// Classify once and print the result
    Classify {
        /// Email text; "-" reads stdin
        #[arg(long)]
        text: Option<String>,

        /// Email file (.txt or .pdf)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether the API is reachable
    Health,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    // Resolve values: CLI args > env vars (handled by clap) > config file > defaults
    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_base_url(api_url.clone());
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Command::Tui);

    let target = match command {
        Command::Tui => LogTarget::SessionFile,
        _ => LogTarget::Stderr,
    };
    let log_file = logging::init_logging(&LogConfig::new(cli.debug, target))?;

    info!("========================================");
    info!("Email Classifier v{}", env!("CARGO_PKG_VERSION"));
    info!("Core: {} v{}", classifier_core::CORE_NAME, classifier_core::VERSION);
    if let Some(path) = &log_file {
        info!("Log file: {}", path.display());
    }
    info!("========================================");

    let config = load_config(&cli)?;
    info!("API URL: {}", config.api.base_url);

    match command {
        Command::Tui => {
            logging::spawn_log_cleanup_task();
            ui::app::run(config).await
        }
        Command::Classify { text, file, json } => {
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            commands::classify(config, text, file, format).await
        }
        Command::Health => commands::health(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_classify_arguments() {
        let cli = Cli::try_parse_from([
            "email-classifier",
            "--api-url",
            "https://api.example.com/api/v1",
            "classify",
            "--text",
            "Preciso pagar a fatura",
            "--json",
        ])
        .expect("valid arguments");

        assert_eq!(cli.api_url.as_deref(), Some("https://api.example.com/api/v1"));
        match cli.command {
            Some(Command::Classify { text, file, json }) => {
                assert_eq!(text.as_deref(), Some("Preciso pagar a fatura"));
                assert!(file.is_none());
                assert!(json);
            }
            _ => panic!("expected classify command"),
        }
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = Cli::try_parse_from([
            "email-classifier",
            "--config",
            "/nonexistent/config.toml",
            "health",
        ])
        .expect("valid arguments");
        assert!(load_config(&cli).is_err());
    }

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "email-classifier-{}-{}.toml",
            name,
            std::process::id()
        ));
        std::fs::write(&path, content).expect("write temp config");
        path
    }

    fn resolved_url(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args.iter().copied()).expect("valid arguments");
        load_config(&cli).expect("config loads").api.base_url
    }

    // Every case that depends on EMAIL_CLASSIFIER_API_URL lives in this one
    // test; the variable is process-wide.
    #[test]
    fn api_url_resolution_order() {
        const ENV: &str = "EMAIL_CLASSIFIER_API_URL";
        let file = write_config(
            "precedence",
            "[api]\nbase_url = \"https://file.example/api/v1\"\n",
        );
        let empty = write_config("empty", "");
        let file_arg = file.to_str().expect("utf-8 temp path");
        let empty_arg = empty.to_str().expect("utf-8 temp path");

        std::env::remove_var(ENV);
        assert_eq!(
            resolved_url(&["email-classifier", "--config", empty_arg, "health"]),
            classifier_core::service::config::DEFAULT_API_BASE_URL
        );
        assert_eq!(
            resolved_url(&["email-classifier", "--config", file_arg, "health"]),
            "https://file.example/api/v1"
        );
        assert_eq!(
            resolved_url(&[
                "email-classifier",
                "--config",
                file_arg,
                "--api-url",
                "https://flag.example/api/v1",
                "health",
            ]),
            "https://flag.example/api/v1"
        );

        std::env::set_var(ENV, "https://env.example/api/v1");
        let from_env = resolved_url(&["email-classifier", "--config", file_arg, "health"]);
        let flag_over_env = resolved_url(&[
            "email-classifier",
            "--config",
            file_arg,
            "--api-url",
            "https://flag.example/api/v1",
            "health",
        ]);
        std::env::remove_var(ENV);

        assert_eq!(from_env, "https://env.example/api/v1");
        assert_eq!(flag_over_env, "https://flag.example/api/v1");

        let _ = std::fs::remove_file(&file);
        let _ = std::fs::remove_file(&empty);
    }
}
