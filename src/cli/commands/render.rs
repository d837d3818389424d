//! `pagekit render` command - Render a page over records

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{
    load_catalog, load_config, output_format, print_structured, read_document, read_records,
};
use crate::cli::output::page_to_text;
use crate::cli::GlobalOpts;
use crate::core::record::{DataSource, Record};
use crate::render::render_config;
use crate::schema::validator::validate;

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Page configuration file (JSON or YAML)
    pub config: PathBuf,

    /// Records file: a JSON or YAML list of records
    #[arg(long, short = 'r')]
    pub records: Option<PathBuf>,

    /// Record id shown by detail pages (default: the first record)
    #[arg(long)]
    pub record: Option<String>,
}

pub fn run(args: RenderArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let catalog = load_catalog(&config)?;

    let document = read_document(&args.config)?;
    let page = validate(&document, &catalog)?;

    let records: Vec<Record> = match args.records {
        Some(ref path) => read_records(path)?,
        None => Vec::new(),
    };

    let data = if page.template.is_single_record() {
        let record = match args.record {
            Some(ref id) => records.iter().find(|r| &r.id == id),
            None => records.first(),
        };
        DataSource::Single(record)
    } else {
        DataSource::Collection(&records)
    };

    let rendered = render_config(&page, &catalog, data);

    let format = output_format(global, &config);
    if format.is_structured() {
        print_structured(&rendered, format)
    } else {
        print!("{}", page_to_text(&rendered, &config.table_settings()));
        Ok(())
    }
}
