use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::theme::ThemePreset;

const APP_DIR: &str = "todo-app";
const DEFAULT_THEME: &str = "default";
const MIN_NOTICE_TTL_MS: u64 = 500;
const MAX_NOTICE_TTL_MS: u64 = 30_000;
const DEFAULT_NOTICE_TTL_MS: u64 = 2_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    /// Overrides the default database location when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    /// How long a footer notice stays visible.
    pub notice_ttl_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            database_path: None,
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(APP_DIR);
        path.push("settings.toml");
        Some(path)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    settings.validate();
                    settings
                }
                Err(error) => {
                    warn!(
                        "failed to parse settings config '{}': {}",
                        path.display(),
                        error
                    );
                    Self::default()
                }
            },
            Err(error) => {
                warn!(
                    "failed to read settings config '{}': {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| anyhow!("unable to determine config path"))?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("invalid settings config path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory '{}'", parent.display()))?;

        let mut validated = self.clone();
        validated.validate();
        let contents =
            toml::to_string_pretty(&validated).context("failed to serialize settings to TOML")?;

        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("invalid settings config file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary settings file '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "failed to replace settings file '{}' with '{}'",
                path.display(),
                tmp_path.display()
            )
        })?;

        Ok(())
    }

    pub fn theme_preset(&self) -> ThemePreset {
        ThemePreset::from_str(&self.theme).unwrap_or_default()
    }

    fn validate(&mut self) {
        self.notice_ttl_ms = self
            .notice_ttl_ms
            .clamp(MIN_NOTICE_TTL_MS, MAX_NOTICE_TTL_MS);

        self.theme = match ThemePreset::from_str(&self.theme) {
            Ok(preset) => preset.as_str().to_string(),
            Err(()) => {
                warn!(
                    "invalid theme '{}' in settings config; falling back to default",
                    self.theme
                );
                DEFAULT_THEME.to_string()
            }
        };

        if self
            .database_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            self.database_path = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings_file_path(temp_dir: &TempDir) -> PathBuf {
        temp_dir.path().join(APP_DIR).join("settings.toml")
    }

    fn write_settings(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().expect("settings path should have parent"))
            .expect("failed to create config dir");
        fs::write(path, contents).expect("failed to write settings");
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, "default");
        assert_eq!(settings.database_path, None);
        assert_eq!(settings.notice_ttl_ms, 2_500);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = settings_file_path(&temp_dir);
        assert_eq!(Settings::load_from_path(&path), Settings::default());
    }

    #[test]
    fn test_load_malformed_toml() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = settings_file_path(&temp_dir);
        write_settings(&path, "theme = \"mono\"\nnotice_ttl_ms = [invalid");

        assert_eq!(Settings::load_from_path(&path), Settings::default());
    }

    #[test]
    fn test_load_partial_toml() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = settings_file_path(&temp_dir);
        write_settings(&path, "database_path = \"/srv/todos/todo.db\"");

        let settings = Settings::load_from_path(&path);
        assert_eq!(settings.theme, DEFAULT_THEME);
        assert_eq!(
            settings.database_path,
            Some(PathBuf::from("/srv/todos/todo.db"))
        );
        assert_eq!(settings.notice_ttl_ms, DEFAULT_NOTICE_TTL_MS);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = settings_file_path(&temp_dir);
        let expected = Settings {
            theme: "high-contrast".to_string(),
            database_path: Some(temp_dir.path().join("todo.db")),
            notice_ttl_ms: 4_000,
        };

        expected
            .save_to_path(&path)
            .expect("failed to save settings for roundtrip test");

        assert_eq!(Settings::load_from_path(&path), expected);
    }

    #[test]
    fn test_validate_clamps_notice_ttl() {
        let mut settings = Settings {
            notice_ttl_ms: 1,
            ..Settings::default()
        };
        settings.validate();
        assert_eq!(settings.notice_ttl_ms, MIN_NOTICE_TTL_MS);

        settings.notice_ttl_ms = u64::MAX;
        settings.validate();
        assert_eq!(settings.notice_ttl_ms, MAX_NOTICE_TTL_MS);
    }

    #[test]
    fn test_validate_theme_alias_and_fallback() {
        let mut alias = Settings {
            theme: "day".to_string(),
            ..Settings::default()
        };
        alias.validate();
        assert_eq!(alias.theme, "light");
        assert_eq!(alias.theme_preset(), ThemePreset::Light);

        let mut unknown = Settings {
            theme: "retro-wave".to_string(),
            ..Settings::default()
        };
        unknown.validate();
        assert_eq!(unknown.theme, "default");
    }

    #[test]
    fn test_validate_drops_empty_database_path() {
        let mut settings = Settings {
            database_path: Some(PathBuf::new()),
            ..Settings::default()
        };
        settings.validate();
        assert_eq!(settings.database_path, None);
    }

    #[test]
    fn test_atomic_write_creates_dirs() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = settings_file_path(&temp_dir);

        Settings::default()
            .save_to_path(&path)
            .expect("failed to save settings to nested path");

        assert!(path.exists());
        assert!(!path.with_file_name(".settings.toml.tmp").exists());
    }
}
