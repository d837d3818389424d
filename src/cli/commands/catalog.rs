//! `pagekit catalog` command - Inspect the object catalog

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{load_catalog, load_config, output_format, print_structured};
use crate::cli::output::{catalog_to_text, object_to_text};
use crate::cli::GlobalOpts;

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// List all objects in the catalog
    List,

    /// Show the fields of one object
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Object key (contact, company, etc.)
    pub object: String,
}

pub fn run(cmd: CatalogCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let catalog = load_catalog(&config)?;
    let format = output_format(global, &config);

    match cmd {
        CatalogCommands::List => {
            if format.is_structured() {
                return print_structured(&catalog.objects(), format);
            }
            print!("{}", catalog_to_text(&catalog));
            if !global.quiet {
                println!("\nUse 'pagekit catalog show <object>' for field details");
            }
            Ok(())
        }
        CatalogCommands::Show(args) => {
            let Some(object) = catalog.lookup(&args.object) else {
                let known: Vec<&str> = catalog.objects().iter().map(|o| o.object_key.as_str()).collect();
                return Err(miette::miette!(
                    help = format!("known objects: {}", known.join(", ")),
                    "Unknown object: {}",
                    args.object
                ));
            };
            if format.is_structured() {
                return print_structured(object, format);
            }
            print!("{}", object_to_text(object));
            Ok(())
        }
    }
}
