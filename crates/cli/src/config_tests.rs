use std::path::PathBuf;

use clap::Parser;

use super::*;
use crate::cli::{Cli, Commands, LogFormat};

fn run_args(configs: &[&str]) -> RunArgs {
    RunArgs {
        configs: configs.iter().map(PathBuf::from).collect(),
        output: OutputFormat::Text,
    }
}

#[test]
fn test_config_requires_token() {
    let args = run_args(&["team.yaml"]);

    assert_eq!(
        CliConfig::new(None, github::DEFAULT_API_URL, &args).unwrap_err(),
        ConfigError::MissingToken
    );
    assert_eq!(
        CliConfig::new(Some("   "), github::DEFAULT_API_URL, &args).unwrap_err(),
        ConfigError::MissingToken
    );
}

#[test]
fn test_config_requires_documents() {
    let err = CliConfig::new(Some("token"), github::DEFAULT_API_URL, &run_args(&[])).unwrap_err();
    assert_eq!(err, ConfigError::NoDocuments);
}

#[test]
fn test_config_keeps_document_order() {
    let config = CliConfig::new(
        Some("token"),
        "https://ghe.example.com/api/v3",
        &run_args(&["b.yaml", "a.yaml"]),
    )
    .unwrap();

    assert_eq!(config.token, "token");
    assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(
        config.documents,
        [PathBuf::from("b.yaml"), PathBuf::from("a.yaml")]
    );
}

#[test]
fn test_cli_parses_repeated_config_flags() {
    let cli = Cli::try_parse_from([
        "gh-property-manager",
        "apply",
        "--config",
        "team.yaml",
        "--config",
        "env.yaml",
        "--output",
        "json",
        "--token",
        "abc",
        "-vv",
        "--log-format",
        "json",
    ])
    .unwrap();

    let Commands::Apply(args) = &cli.command else {
        panic!("expected apply command");
    };
    assert_eq!(args.configs.len(), 2);
    assert_eq!(args.output, OutputFormat::Json);
    assert_eq!(cli.token.as_deref(), Some("abc"));
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.log_format, LogFormat::Json);
}

#[test]
fn test_cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["gh-property-manager", "destroy"]).is_err());
}
