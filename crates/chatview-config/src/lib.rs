use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Locations probed when no explicit config path is given, in order.
const DEFAULT_PATHS: [&str; 3] = [
    "./chatview.toml",
    "~/.config/chatview/config.toml",
    "~/.chatview.toml",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

/// Renderer preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Emit the copy/replace/review/apply buttons above code blocks
    #[serde(default = "default_code_buttons")]
    pub code_buttons: bool,
}

fn default_code_buttons() -> bool {
    true
}

/// Panel wiring preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// DOM id of the element the update scripts target
    #[serde(default = "default_panel_id")]
    pub panel_id: String,
}

fn default_panel_id() -> String {
    "chat-panel".to_string()
}

/// Upstream streaming endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the bearer token, if any
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_endpoint() -> String {
    "http://localhost:8080/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "default".to_string()
}

fn default_api_key_env() -> String {
    "CHATVIEW_API_KEY".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            code_buttons: default_code_buttons(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            panel_id: default_panel_id(),
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            panel: PanelConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

impl StreamConfig {
    /// Reads the bearer token out of the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }
}

impl Config {
    /// Loads configuration from the given path, or from the first default
    /// location that exists. No file at all means defaults; a file that
    /// fails to read or parse is an error.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = match config_path {
            Some(path) => shellexpand::tilde(path).to_string(),
            None => {
                let found = DEFAULT_PATHS.iter().find_map(|path| {
                    let expanded = shellexpand::tilde(path);
                    if Path::new(expanded.as_ref()).exists() {
                        Some(expanded.to_string())
                    } else {
                        None
                    }
                });
                match found {
                    Some(path) => path,
                    None => return Ok(Self::default()),
                }
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {path}"))?;
        Ok(config)
    }

    pub fn save_to_path(&self, path: &str) -> Result<()> {
        let toml_string = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write config file {path}"))?;
        Ok(())
    }
}
