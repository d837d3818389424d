//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::record::Record;
use crate::yaml::parse_document;

/// File suffixes recognised as page configurations
pub const PAGE_SUFFIXES: &[&str] = &[".page.json", ".page.yaml", ".page.yml"];

/// Load layered config, letting `--catalog` win over every other source
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    if let Some(ref path) = global.catalog {
        config.catalog = Some(path.clone());
    }
    config
}

pub fn load_catalog(config: &Config) -> Result<Catalog> {
    Ok(config.catalog()?)
}

/// Effective output format: `--format`, else `default_format` from config
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|name| <OutputFormat as clap::ValueEnum>::from_str(name, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Whether a path looks like a page configuration file
pub fn is_page_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    PAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Read a JSON or YAML document from disk
pub fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| miette::miette!("Failed to read {}: {}", path.display(), e))?;
    let filename = path.to_string_lossy();
    Ok(parse_document(&content, &filename)?)
}

/// Read a list of records from a JSON or YAML file
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let value = read_document(path)?;
    serde_json::from_value(value)
        .map_err(|e| miette::miette!("Invalid records file {}: {}", path.display(), e))
}

/// Print a value as JSON or YAML
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Yaml => serde_yml::to_string(value).into_diagnostic()?,
        _ => serde_json::to_string_pretty(value).into_diagnostic()?,
    };
    println!("{}", text.trim_end());
    Ok(())
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_page_file() {
        assert!(is_page_file(Path::new("pages/contacts.page.json")));
        assert!(is_page_file(Path::new("dash.PAGE.YAML")));
        assert!(is_page_file(Path::new("detail.page.yml")));
        assert!(!is_page_file(Path::new("records.json")));
        assert!(!is_page_file(Path::new("page.json")));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ééééé", 4), "é...");
    }

    #[test]
    fn test_read_records_yaml() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("records.yaml");
        std::fs::write(
            &path,
            "- id: r1\n  properties:\n    firstName: Ann\n- id: r2\n  properties:\n    firstName: Bo\n",
        )
        .unwrap();
        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("firstName"), Some(&serde_json::json!("Bo")));
    }
}
