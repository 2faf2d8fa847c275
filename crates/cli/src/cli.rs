//! Command-line surface: the `plan` and `apply` subcommands and the global
//! options shared by both.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "gh-property-manager")]
#[command(about = "Manage GitHub repository custom properties from YAML documents")]
#[command(
    long_about = "Declare the desired custom property values of your repositories in YAML \
documents, preview the changes with `plan`, and write them with `apply`.\n\n\
Examples:\n  gh-property-manager plan --config team.yaml\n  \
gh-property-manager apply --config team.yaml --config environment.yaml"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GitHub token used for every API call
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub API root (set for GitHub Enterprise Server)
    #[arg(long, global = true, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_URL)]
    pub api_url: String,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the custom property changes the documents would make
    Plan(RunArgs),
    /// Apply the custom property changes to the repositories
    Apply(RunArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Property document path (can be specified multiple times)
    #[arg(long = "config", value_name = "PATH")]
    pub configs: Vec<PathBuf>,

    /// Report format (written to stdout)
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
