use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".dictscoperc.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one `<key>.json` per dictionary, relative to the
    /// project root unless absolute.
    #[serde(default = "default_unmerged_dictionaries_dir")]
    pub unmerged_dictionaries_dir: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Dashboard base URL, only used to render links to remote dictionaries.
    #[serde(default = "default_cms_url")]
    pub cms_url: String,
    /// Glob patterns excluded from usage scans.
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
}

fn default_unmerged_dictionaries_dir() -> String {
    ".intlayer/unmerged_dictionary".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_cms_url() -> String {
    "https://intlayer.org".to_string()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unmerged_dictionaries_dir: default_unmerged_dictionaries_dir(),
            default_locale: default_locale(),
            cms_url: default_cms_url(),
            ignores: default_ignores(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` is invalid or the
    /// default locale is empty.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.default_locale.trim().is_empty() {
            anyhow::bail!("'defaultLocale' must not be empty");
        }

        Ok(())
    }

    pub fn dictionaries_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.unmerged_dictionaries_dir)
    }

    /// Path of the unmerged dictionary file for `key`.
    pub fn dictionary_path(&self, project_root: &Path, key: &str) -> PathBuf {
        self.dictionaries_dir(project_root).join(format!("{}.json", key))
    }

    /// Dashboard link for a dictionary.
    pub fn dashboard_url(&self, key: &str) -> String {
        format!("{}/dictionary/{}", self.cms_url.trim_end_matches('/'), key)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

/// Supplies the configuration of a project root.
pub trait ConfigProvider: Send + Sync {
    fn load(&self, project_root: &Path) -> Result<Config>;
}

/// Reads `.dictscoperc.json` from the project root upward.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileConfigProvider;

impl ConfigProvider for FileConfigProvider {
    fn load(&self, project_root: &Path) -> Result<Config> {
        let result = load_config(project_root)?;
        if !result.from_file {
            tracing::debug!(root = %project_root.display(), "no config file, using defaults");
        }
        Ok(result.config)
    }
}

/// Hands out the same configuration for every project.
#[derive(Debug, Clone)]
pub struct StaticConfigProvider(pub Config);

impl ConfigProvider for StaticConfigProvider {
    fn load(&self, _project_root: &Path) -> Result<Config> {
        Ok(self.0.clone())
    }
}
