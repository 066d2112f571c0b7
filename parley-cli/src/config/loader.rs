use super::types::{
    GeminiSection, ModelConfig, OllamaSection, ParleyConfig, RawGeminiSection, RawModelConfig,
    RawOllamaSection, RawParleyConfig, DEFAULT_TIMEOUT_SECS,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<ParleyConfig> {
        let mut raw = RawParleyConfig::default();

        // Layer 1: User config
        if let Some(user_path) = Self::user_config_path()
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Project config
        let project_path = Self::project_config_path();
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&project_path)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Config files that exist, in the order they are layered
    pub fn sources() -> Vec<PathBuf> {
        Self::user_config_path()
            .into_iter()
            .chain(std::iter::once(Self::project_config_path()))
            .filter(|path| path.exists())
            .collect()
    }

    fn read_raw(path: &Path) -> Result<RawParleyConfig> {
        debug!(path = %path.display(), "Reading config");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "parley").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with PARLEY_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("PARLEY_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".parley/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawParleyConfig, overlay: RawParleyConfig) -> RawParleyConfig {
        RawParleyConfig {
            model: RawModelConfig {
                provider: overlay.model.provider.or(base.model.provider),
                name: overlay.model.name.or(base.model.name),
                temperature: overlay.model.temperature.or(base.model.temperature),
                max_tokens: overlay.model.max_tokens.or(base.model.max_tokens),
                timeout_secs: overlay.model.timeout_secs.or(base.model.timeout_secs),
            },
            ollama: RawOllamaSection {
                host: overlay.ollama.host.or(base.ollama.host),
            },
            gemini: RawGeminiSection {
                base_url: overlay.gemini.base_url.or(base.gemini.base_url),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawParleyConfig) -> ParleyConfig {
        let provider = raw.model.provider.unwrap_or_default();
        ParleyConfig {
            model: ModelConfig {
                provider,
                name: raw
                    .model
                    .name
                    .unwrap_or_else(|| provider.default_model().to_string()),
                temperature: raw.model.temperature,
                max_tokens: raw.model.max_tokens,
                timeout_secs: raw.model.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            ollama: raw
                .ollama
                .host
                .map(|host| OllamaSection { host })
                .unwrap_or_default(),
            gemini: raw
                .gemini
                .base_url
                .map(|base_url| GeminiSection { base_url })
                .unwrap_or_default(),
        }
    }

    /// Load a single config file with defaults applied (for testing)
    #[cfg(test)]
    pub fn load_from_path(path: &Path) -> Result<ParleyConfig> {
        if path.exists() {
            Ok(Self::finalize(Self::read_raw(path)?))
        } else {
            Ok(ParleyConfig::default())
        }
    }
}
