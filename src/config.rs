use crate::models::options::{OutputFormat, RenderOptions};
use crate::parsing::fence::is_valid_language_tag;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names recognised as project configuration, in lookup order
pub const CONFIG_FILE_NAMES: [&str; 2] = [".fencesplitrc.toml", "fencesplit.toml"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// How responses are rendered
    #[serde(default)]
    pub render: RenderConfig,

    /// Which files are picked up when a directory is given
    #[serde(default)]
    pub input: InputConfig,
}

/// Rendering settings.
///
/// Every key is optional so that a project file only overrides the keys it
/// actually sets; defaults are applied when building [`RenderOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RenderConfig {
    /// Output format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Highlighting hint for code blocks without a language tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_language: Option<String>,

    /// Prefix output with the unsegmented response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_raw: Option<bool>,
}

impl RenderConfig {
    /// Keys set in `other` win, the rest are kept from `self`
    pub fn merge_with(&self, other: &RenderConfig) -> RenderConfig {
        RenderConfig {
            format: other.format.or(self.format),
            fallback_language: other
                .fallback_language
                .clone()
                .or_else(|| self.fallback_language.clone()),
            show_raw: other.show_raw.or(self.show_raw),
        }
    }
}

/// Input discovery settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct InputConfig {
    /// File extensions read when expanding directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

// Default value helpers
fn default_extensions() -> Vec<String> {
    vec!["txt".to_string(), "md".to_string()]
}

impl InputConfig {
    /// Input config that only reads the given extensions
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: Some(extensions.into_iter().map(Into::into).collect()),
        }
    }

    /// Configured extensions, or the defaults when none are set
    pub fn effective_extensions(&self) -> Vec<String> {
        self.extensions.clone().unwrap_or_else(default_extensions)
    }

    /// Check whether `path` has one of the configured extensions
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };

        self.effective_extensions()
            .iter()
            .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in: {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(fallback) = &self.render.fallback_language
            && !is_valid_language_tag(fallback)
        {
            return Err(anyhow::anyhow!(
                "Fallback language '{}' may only contain letters, digits and underscores",
                fallback
            ));
        }

        for extension in self.input.extensions.iter().flatten() {
            if extension.trim_start_matches('.').is_empty() {
                return Err(anyhow::anyhow!("Input extensions must not be empty"));
            }

            if extension.contains('/') || extension.contains('\\') {
                return Err(anyhow::anyhow!(
                    "Input extension '{}' contains a path separator",
                    extension
                ));
            }
        }

        Ok(())
    }

    /// Create a template configuration
    pub fn template() -> String {
        r#"# fencesplit configuration file

[render]
# Output format: "plain", "html", "json" or "markdown"
format = "plain"
# Highlighting hint for code blocks written without a language tag
fallback_language = ""
# Print the unsegmented response before the rendered one
show_raw = false

[input]
# Extensions read when a directory is passed on the command line
extensions = ["txt", "md"]
"#
        .to_string()
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge_with(&self, other: &Config) -> Config {
        Config {
            render: self.render.merge_with(&other.render),
            input: InputConfig {
                extensions: other
                    .input
                    .extensions
                    .clone()
                    .or_else(|| self.input.extensions.clone()),
            },
        }
    }

    /// Load the configuration that applies when running from `start_dir`.
    ///
    /// The user-level config is read first and the nearest project config,
    /// if any, is merged on top of it. Unreadable files are skipped with a
    /// warning.
    pub fn discover<P: AsRef<Path>>(start_dir: P) -> Config {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path()
            && global_path.is_file()
        {
            match Config::from_file(&global_path) {
                Ok(global) => {
                    log::debug!("Loaded global config: {}", global_path.display());
                    config = global;
                }
                Err(e) => log::warn!("Failed to load global config: {e:#}"),
            }
        }

        if let Some(project_path) = Self::find_project_config(start_dir.as_ref()) {
            match Config::from_file(&project_path) {
                Ok(project) => {
                    log::debug!("Loaded config: {}", project_path.display());
                    config = config.merge_with(&project);
                }
                Err(e) => log::warn!(
                    "Failed to load config file {}: {e:#}",
                    project_path.display()
                ),
            }
        }

        config
    }

    /// Find the nearest project config walking up from `start_dir`
    pub fn find_project_config(start_dir: &Path) -> Option<PathBuf> {
        start_dir.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Get the global configuration file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fencesplit").join("config.toml"))
    }

    /// Render options described by this configuration
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            format: self.render.format.unwrap_or_default(),
            fallback_language: self
                .render
                .fallback_language
                .clone()
                .filter(|fallback| !fallback.is_empty()),
            show_raw: self.render.show_raw.unwrap_or(false),
        }
    }
}
