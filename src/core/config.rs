//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::catalog::{Catalog, CatalogError};
use crate::table::format::is_valid_date_format;
use crate::table::{FormatSettings, TableSettings};

/// Name of the per-project settings directory
pub const PROJECT_DIR: &str = ".pagekit";

/// Pagekit configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file to use instead of the built-in objects
    pub catalog: Option<PathBuf>,

    /// Width given to table columns that don't declare one
    pub default_column_width: Option<u32>,

    /// Floor applied when resizing table columns
    pub min_column_width: Option<u32>,

    /// Prefix used when formatting currency values
    pub currency_symbol: Option<String>,

    /// chrono format string for date fields
    pub date_format: Option<String>,

    /// chrono format string for datetime fields
    pub datetime_format: Option<String>,

    /// Default output format for the CLI
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/pagekit/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(mut global) = Self::read_file(&global_path) {
                if let Some(dir) = global_path.parent() {
                    global.rebase(dir);
                }
                config.merge(global);
            }
        }

        // 3. Project config (.pagekit/config.yaml)
        if let Ok(cwd) = std::env::current_dir() {
            if let Some(project_path) = Self::discover_project_config(&cwd) {
                if let Some(mut project) = Self::read_file(&project_path) {
                    // .pagekit/config.yaml paths are relative to the project root
                    if let Some(root) = project_path.parent().and_then(Path::parent) {
                        project.rebase(root);
                    }
                    config.merge(project);
                }
            }
        }

        // 4. Environment variables
        if let Ok(catalog) = std::env::var("PAGEKIT_CATALOG") {
            config.catalog = Some(PathBuf::from(catalog));
        }
        if let Ok(symbol) = std::env::var("PAGEKIT_CURRENCY") {
            config.currency_symbol = Some(symbol);
        }

        config
    }

    /// Parse a single config layer from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(content)
    }

    /// Resolve a relative `catalog` path against the directory a layer belongs to
    pub fn rebase(&mut self, root: &Path) {
        if let Some(catalog) = self.catalog.take() {
            self.catalog = Some(if catalog.is_relative() {
                root.join(catalog)
            } else {
                catalog
            });
        }
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match Self::from_yaml_str(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "pagekit")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Walk up from `start` looking for `.pagekit/config.yaml`
    pub fn discover_project_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(PROJECT_DIR).join("config.yaml");
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
        if other.default_column_width.is_some() {
            self.default_column_width = other.default_column_width;
        }
        if other.min_column_width.is_some() {
            self.min_column_width = other.min_column_width;
        }
        if other.currency_symbol.is_some() {
            self.currency_symbol = other.currency_symbol;
        }
        if other.date_format.is_some() {
            self.date_format = other.date_format;
        }
        if other.datetime_format.is_some() {
            self.datetime_format = other.datetime_format;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }

    /// Build the catalog this configuration points at
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::builtin()),
        }
    }

    /// Value formatting settings with configured overrides applied
    pub fn format_settings(&self) -> FormatSettings {
        let mut settings = FormatSettings::default();
        if let Some(ref symbol) = self.currency_symbol {
            settings.currency_symbol = symbol.clone();
        }
        if let Some(fmt) = checked_date_format("date_format", self.date_format.as_deref()) {
            settings.date_format = fmt;
        }
        if let Some(fmt) = checked_date_format("datetime_format", self.datetime_format.as_deref()) {
            settings.datetime_format = fmt;
        }
        settings
    }

    /// Interactive table settings with configured overrides applied
    pub fn table_settings(&self) -> TableSettings {
        let mut settings = TableSettings {
            format: self.format_settings(),
            ..TableSettings::default()
        };
        if let Some(width) = self.default_column_width {
            settings.default_width = width;
        }
        if let Some(width) = self.min_column_width {
            settings.min_width = width;
        }
        settings
    }
}

fn checked_date_format(name: &str, format: Option<&str>) -> Option<String> {
    let format = format?;
    if is_valid_date_format(format) {
        Some(format.to_string())
    } else {
        tracing::warn!(setting = name, format, "ignoring invalid date format");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_later_layer() {
        let mut base = Config::from_yaml_str("currency_symbol: \"€\"\nmin_column_width: 60\n").unwrap();
        let project = Config::from_yaml_str("min_column_width: 100\n").unwrap();
        base.merge(project);

        assert_eq!(base.currency_symbol.as_deref(), Some("€"));
        assert_eq!(base.min_column_width, Some(100));
    }

    #[test]
    fn test_settings_derive_from_config() {
        let config = Config::from_yaml_str(
            "default_column_width: 150\ncurrency_symbol: \"£\"\ndate_format: \"%Y-%m-%d\"\n",
        )
        .unwrap();
        let table = config.table_settings();
        assert_eq!(table.default_width, 150);
        assert_eq!(table.min_width, TableSettings::default().min_width);
        assert_eq!(table.format.currency_symbol, "£");
        assert_eq!(table.format.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_discover_project_config_walks_up() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path().join(PROJECT_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "default_format: json\n").unwrap();
        let nested = tmp.path().join("pages").join("crm");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Config::discover_project_config(&nested).unwrap();
        assert_eq!(found, dir.join("config.yaml"));
        let config = Config::read_file(&found).unwrap();
        assert_eq!(config.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_invalid_date_format_keeps_default() {
        let config = Config::from_yaml_str("date_format: \"%Q\"\ndatetime_format: \"%d.%m.%Y %H:%M\"\n").unwrap();
        let settings = config.format_settings();
        assert_eq!(settings.date_format, FormatSettings::default().date_format);
        assert_eq!(settings.datetime_format, "%d.%m.%Y %H:%M");
    }

    #[test]
    fn test_rebase_relative_catalog() {
        let root = Path::new("/work/project");
        let mut config = Config::from_yaml_str("catalog: deal-catalog.yaml\n").unwrap();
        config.rebase(root);
        assert_eq!(config.catalog, Some(root.join("deal-catalog.yaml")));

        let mut config = Config::from_yaml_str("catalog: /etc/pagekit/catalog.yaml\n").unwrap();
        config.rebase(root);
        assert_eq!(config.catalog, Some(PathBuf::from("/etc/pagekit/catalog.yaml")));
    }

    #[test]
    fn test_default_catalog_is_builtin() {
        let config = Config::default();
        let catalog = config.catalog().unwrap();
        assert!(catalog.lookup("contact").is_some());
    }
}
