//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    catalog::CatalogCommands, completions::CompletionsArgs, generate::GenerateArgs,
    prompt::PromptArgs, render::RenderArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "pagekit")]
#[command(author, version, about = "Catalog-driven page configuration engine")]
#[command(long_about = "Validate, render and generate declarative page configurations against an object catalog.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging to stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog file (default: from config, else the built-in catalog)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate page configuration files
    Validate(ValidateArgs),

    /// Render a page configuration over a set of records
    Render(RenderArgs),

    /// Inspect the object catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Print the instructions given to page producers
    Prompt(PromptArgs),

    /// Generate a page configuration with an external producer command
    Generate(GenerateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (tables for render and catalog)
    #[default]
    Auto,
    /// Same as auto, without colors
    Text,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Yaml)
    }
}
