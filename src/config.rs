use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Presentation toggles, handed to the host screens at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_romaji: bool,
    pub show_kana_prompt: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_romaji: true,
            show_kana_prompt: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DojoConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub display: DisplayConfig,
}

impl Default for DojoConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            display: DisplayConfig::default(),
        }
    }
}

fn get_config_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".config\\kotoba-dojo")
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".config/kotoba-dojo")
    }
}

pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

impl DojoConfig {
    /// Reads `path` if it exists (defaults otherwise), then applies
    /// `DOJO_API_URL`, `DOJO_API_KEY` and `DOJO_TIMEOUT_SECS`.
    pub fn load(path: &Path) -> io::Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid config {}: {}", path.display(), e),
            )
        })
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DOJO_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(key) = lookup("DOJO_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(secs) = lookup("DOJO_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.timeout_secs = secs;
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}
