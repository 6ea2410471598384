use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the optional config file.
pub const DEFAULT_CONFIG_FILE: &str = ".python-doctor.toml";

const DEFAULT_RESULTS_DIR: &str = "/tmp";
const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .python-doctor.toml.
/// All fields are optional; the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub comment: CommentConfig,

    #[serde(default)]
    pub results: ResultsConfig,

    #[serde(default)]
    pub noise: NoiseConfig,

    /// Replaces the built-in tool registry when non-empty
    #[serde(default)]
    pub tools: Vec<ToolConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. If None, falls back to GITHUB_TOKEN env var.
    pub token: Option<String>,
    /// REST API base. If None, falls back to GITHUB_API_URL, then api.github.com.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentConfig {
    /// Whether to post the PR comment. POST_COMMENT overrides this.
    pub post: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsConfig {
    /// Directory holding the `pydoctor_<tool>.txt` files
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoiseConfig {
    /// Extra patterns marking a result file as clean, appended to the built-ins
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolConfig {
    pub id: String,
    pub label: Option<String>,
    pub description: Option<String>,
    /// Result file; relative paths resolve against `results.dir`
    pub file: Option<PathBuf>,
    pub weight: u32,
}

impl Config {
    /// Load configuration from `path`, or from .python-doctor.toml in the
    /// current directory when no path is given.
    ///
    /// An explicit path must exist. The default file is optional and a
    /// missing one yields `Config::default()`. Environment overrides are
    /// applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a specific path without environment overrides.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply POST_COMMENT, GITHUB_TOKEN and GITHUB_API_URL.
    ///
    /// POST_COMMENT wins over the file; it enables posting only when it is
    /// exactly "true". The token and API URL from the file take precedence
    /// over the environment.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(post) = var("POST_COMMENT") {
            self.comment.post = Some(post == "true");
        }
        if self.github.token.is_none() {
            self.github.token = var("GITHUB_TOKEN").filter(|t| !t.is_empty());
        }
        if self.github.api_url.is_none() {
            self.github.api_url = var("GITHUB_API_URL").filter(|u| !u.is_empty());
        }
    }

    pub fn should_post(&self) -> bool {
        self.comment.post.unwrap_or(true)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.results
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR))
    }

    pub fn api_url(&self) -> &str {
        self.github.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn github_token(&self) -> Option<&str> {
        self.github.token.as_deref()
    }
}
