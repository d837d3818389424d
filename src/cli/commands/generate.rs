//! `pagekit generate` command - Generate a page with an external producer
//!
//! The producer is any shell command. It receives the instructions in
//! `PAGEKIT_INSTRUCTIONS` and the request in `PAGEKIT_REQUEST`, and must
//! print a single JSON document on stdout.

use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::cli::helpers::{load_catalog, load_config, output_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::schema::producer::{generate_page_config, ConfigProducer, ProducerError};

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// What the page should show, in plain words
    pub request: String,

    /// Shell command that produces a candidate document
    #[arg(long, short = 'p', env = "PAGEKIT_PRODUCER")]
    pub producer: String,

    /// Write the page to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Producer backed by a shell command
pub struct CommandProducer {
    command: String,
}

impl CommandProducer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&self.command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(&self.command);
            cmd
        }
    }
}

impl ConfigProducer for CommandProducer {
    fn produce(&mut self, instructions: &str, request: &str) -> Result<String, ProducerError> {
        tracing::debug!(command = %self.command, "running producer");
        let output = self
            .shell()
            .env("PAGEKIT_INSTRUCTIONS", instructions)
            .env("PAGEKIT_REQUEST", request)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ProducerError::Failed(format!("could not start '{}': {}", self.command, e)))?;

        if !output.status.success() {
            return Err(ProducerError::Failed(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| ProducerError::Failed(format!("output is not UTF-8: {}", e)))
    }
}

pub fn run(args: GenerateArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let catalog = load_catalog(&config)?;

    let mut producer = CommandProducer::new(args.producer);
    let page = generate_page_config(&mut producer, &catalog, &args.request)?;

    match args.output {
        Some(path) => {
            let text = match output_format(global, &config) {
                OutputFormat::Yaml => serde_yml::to_string(&page).into_diagnostic()?,
                _ => serde_json::to_string_pretty(&page).into_diagnostic()?,
            };
            std::fs::write(&path, text).into_diagnostic()?;
            if !global.quiet {
                eprintln!("Wrote page '{}' to {}", page.id, path.display());
            }
            Ok(())
        }
        None => print_structured(&page, output_format(global, &config)),
    }
}
