//! `pagekit prompt` command - Print producer instructions

use miette::Result;

use crate::cli::helpers::{load_catalog, load_config};
use crate::cli::GlobalOpts;
use crate::schema::producer::ProducerInstructions;

#[derive(clap::Args, Debug)]
pub struct PromptArgs {
    /// Errors from a previous attempt, appended as corrections (repeatable)
    #[arg(long = "error", short = 'e')]
    pub errors: Vec<String>,
}

pub fn run(args: PromptArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let catalog = load_catalog(&config)?;
    let instructions = ProducerInstructions::new(&catalog)?;

    let text = if args.errors.is_empty() {
        instructions.initial()?
    } else {
        instructions.correction(&args.errors)?
    };
    println!("{}", text.trim_end());
    Ok(())
}
