//! Configuration file (fenceline.toml).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use fenceline_highlight::DEFAULT_THEME;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub build: BuildSettings,
}

#[derive(Debug, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_content_dir")]
    pub dir: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            output: default_output(),
            title: default_title(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HighlightConfig {
    /// Bundled syntect theme name
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Skip syntect and emit unstyled tokens
    #[serde(default)]
    pub plain: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            plain: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_content_dir() -> String {
    "content/blog".to_string()
}
fn default_output() -> String {
    "public".to_string()
}
fn default_title() -> String {
    "Blog".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}
fn default_minify() -> bool {
    true
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.content.dir, "content/blog");
        assert_eq!(config.content.output, "public");
        assert_eq!(config.highlight.theme, DEFAULT_THEME);
        assert!(!config.highlight.plain);
        assert!(config.build.minify);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
[content]
title = "Notes"

[highlight]
theme = "InspiredGitHub"
"#,
        )
        .unwrap();

        assert_eq!(config.content.title, "Notes");
        assert_eq!(config.content.dir, "content/blog");
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert!(config.build.minify);
    }

    #[test]
    fn missing_file_is_default_and_malformed_file_errors() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.content.base_url, "/");

        let bad = temp.path().join("fenceline.toml");
        fs::write(&bad, "[content\ndir = 1").unwrap();
        assert!(load_config(&bad).is_err());
    }
}
