//! `pagekit validate` command - Validate page configuration files

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::helpers::{is_page_file, load_catalog, load_config, output_format, print_structured};
use crate::cli::GlobalOpts;
use crate::schema::validator::Validator;
use crate::yaml::DocumentError;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Files or directories to validate (default: current directory)
    #[arg()]
    pub paths: Vec<PathBuf>,

    /// Continue validation after first failing file
    #[arg(long)]
    pub keep_going: bool,

    /// Show summary only, don't show individual errors
    #[arg(long)]
    pub summary: bool,
}

/// Validation statistics
#[derive(Default)]
struct ValidationStats {
    files_checked: usize,
    files_passed: usize,
    files_failed: usize,
    total_errors: usize,
}

/// Per-file result for structured output
#[derive(Serialize)]
struct FileResult {
    file: String,
    valid: bool,
    errors: Vec<String>,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let catalog = load_catalog(&config)?;
    let validator = Validator::new(&catalog);

    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths.clone()
    };
    let files = expand_paths(&paths);

    let format = output_format(global, &config);
    let structured = format.is_structured();
    let chatty = !structured && !global.quiet;
    let mut stats = ValidationStats::default();
    let mut results = Vec::new();

    if chatty {
        println!(
            "{} Validating {} file(s)...\n",
            style("→").blue(),
            files.len()
        );
    }

    for path in &files {
        stats.files_checked += 1;

        let outcome = std::fs::read_to_string(path)
            .map_err(DocumentError::from)
            .and_then(|content| validator.validate_str(&content, &path.to_string_lossy()));

        match outcome {
            Ok(page) => {
                stats.files_passed += 1;
                results.push(FileResult {
                    file: path.display().to_string(),
                    valid: true,
                    errors: Vec::new(),
                });
                if chatty && !args.summary {
                    println!(
                        "{} {} {}",
                        style("✓").green(),
                        path.display(),
                        style(format!("({}, {} block(s))", page.template, page.blocks.len())).dim()
                    );
                }
            }
            Err(e) => {
                let messages = error_messages(&e);
                stats.files_failed += 1;
                stats.total_errors += messages.len();

                if chatty && !args.summary {
                    println!(
                        "{} {} - {} error(s)",
                        style("✗").red(),
                        path.display(),
                        messages.len()
                    );

                    // Print detailed error using miette
                    let report = miette::Report::new(e);
                    println!("{:?}", report);
                }
                results.push(FileResult {
                    file: path.display().to_string(),
                    valid: false,
                    errors: messages,
                });

                if !args.keep_going {
                    break;
                }
            }
        }
    }

    if structured {
        print_structured(&results, format)?;
    } else if !global.quiet {
        print_summary(&stats);
    }

    match stats.files_failed {
        0 => {
            if chatty {
                println!(
                    "{} All files passed validation!",
                    style("✓").green().bold()
                );
            }
            Ok(())
        }
        1 => Err(miette::miette!("Validation failed: 1 file has errors")),
        n => Err(miette::miette!("Validation failed: {} files have errors", n)),
    }
}

fn error_messages(error: &DocumentError) -> Vec<String> {
    match error {
        DocumentError::Invalid(errors) => errors.messages(),
        other => vec![other.to_string()],
    }
}

fn print_summary(stats: &ValidationStats) {
    println!();
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Validation Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Files checked:  {}", style(stats.files_checked).cyan());
    println!("  Files passed:   {}", style(stats.files_passed).green());
    println!("  Files failed:   {}", style(stats.files_failed).red());
    println!("  Total errors:   {}", style(stats.total_errors).red());
    println!();
}

/// Expand directories into the page files they contain
///
/// Files named explicitly are always validated, whatever their name.
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(page_files_in(path));
        } else {
            files.push(path.clone());
        }
    }

    files
}

fn page_files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden directories such as .git and .pagekit
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') || e.depth() == 0
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_page_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_expand_paths_walks_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("pages/nested")).unwrap();
        fs::create_dir_all(tmp.path().join(".hidden")).unwrap();
        fs::write(tmp.path().join("pages/b.page.yaml"), "").unwrap();
        fs::write(tmp.path().join("pages/nested/a.page.json"), "").unwrap();
        fs::write(tmp.path().join("pages/records.json"), "").unwrap();
        fs::write(tmp.path().join(".hidden/c.page.json"), "").unwrap();
        let explicit = tmp.path().join("explicit.json");

        let files = expand_paths(&[tmp.path().to_path_buf(), explicit.clone()]);
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["b.page.yaml", "a.page.json", "explicit.json"]);
    }
}
