//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const MAX_RECENT: usize = 10;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Last opened workspace folder
    pub last_folder: Option<PathBuf>,
    /// Recently opened documents, most recent first
    pub recent_files: Vec<PathBuf>,
    /// Defaults for newly opened file pages
    pub file: FileSettings,
    /// UI settings
    pub ui: UiConfig,
}

/// How a file page saves its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// Write over the opened file instead of a `_new` sibling
    pub overwrite: bool,
    /// Keep a `.bak` copy of any file about to be replaced
    pub backup: bool,
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Sidebar width
    pub sidebar_width: f32,
    /// Width of the type column
    pub type_column_width: f32,
    /// Width of the name column
    pub name_column_width: f32,
    /// Height of the header panel
    pub header_height: f32,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            overwrite: false,
            backup: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_width: 250.0,
            type_column_width: 80.0,
            name_column_width: 400.0,
            header_height: 80.0,
        }
    }
}

impl AppConfig {
    /// Platform config file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "confpad", "Confpad")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Add a document to recent files
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_files_dedup_and_cap() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.add_recent_file(PathBuf::from(format!("doc{i}.json")));
        }
        config.add_recent_file(PathBuf::from("doc5.json"));

        assert_eq!(config.recent_files.len(), MAX_RECENT);
        assert_eq!(config.recent_files[0], PathBuf::from("doc5.json"));
        assert_eq!(
            config
                .recent_files
                .iter()
                .filter(|p| p.as_path() == Path::new("doc5.json"))
                .count(),
            1
        );
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(!config.file.overwrite);
        assert!(config.file.backup);
        assert_eq!(config.ui.type_column_width, 80.0);
        assert_eq!(config.ui.name_column_width, 400.0);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "file": { "overwrite": true } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.file.overwrite);
        assert!(config.file.backup);
        assert_eq!(config.ui.sidebar_width, 250.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.last_folder = Some(PathBuf::from("/srv/programs"));
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.last_folder, config.last_folder);
        assert!(AppConfig::load_from(&dir.path().join("absent.json"))
            .unwrap()
            .recent_files
            .is_empty());
    }
}
