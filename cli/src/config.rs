use std::path::{Path, PathBuf};

use anyhow::Context;
use mineai_agent::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PACING, GeminiConfig};
use mineai_core::Difficulty;
use serde::{Deserialize, Serialize};

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ai: AiSettings,
    pub game: GameSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Delay between two autoplay requests.
    pub pacing_ms: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            model: DEFAULT_MODEL.into(),
            api_key: None,
            pacing_ms: DEFAULT_PACING.as_millis() as u64,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub difficulty: String,
    pub stats_path: PathBuf,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default().label().into(),
            stats_path: "mineai-stats.json".into(),
        }
    }
}

impl Settings {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn difficulty(&self) -> anyhow::Result<Difficulty> {
        self.game
            .difficulty
            .parse()
            .with_context(|| format!("difficulty {:?}", self.game.difficulty))
    }

    /// Command line flag first, then the environment, then the config file.
    pub fn api_key(&self, flag: Option<String>, env: Option<String>) -> Option<String> {
        flag.or(env)
            .or_else(|| self.ai.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn gemini(&self, api_key: String) -> GeminiConfig {
        GeminiConfig {
            endpoint: self.ai.endpoint.clone(),
            model: self.ai.model.clone(),
            api_key,
        }
    }
}
