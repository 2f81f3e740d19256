//! Configuration for Tally
//!
//! All runtime configuration lives in one [`Config`] value that is resolved
//! once at startup and passed down explicitly. Nothing else in the crate
//! reads the environment.
//!
//! ## Configuration Resolution
//!
//! Three layers, later layers win:
//! 1. Built-in defaults
//! 2. TOML config file (explicit path, else ~/.config/tally/config.toml)
//! 3. Environment variables:
//!    - `SUPABASE_URL`, `SUPABASE_ANON_KEY` (store)
//!    - `OPENAI_BASE_URL`, `OPENAI_API_KEY`, `OPENAI_MODEL` (text generation)
//!    - `TALLY_SESSION_FILE` (session storage path)
//!
//! The store is configured only when both its URL and anon key resolve; the
//! text generation backend only when both its base URL and API key resolve.
//! A half-configured section is treated as absent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default model when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Hosted store connection settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL (e.g. https://xyzcompany.supabase.co)
    pub url: String,
    /// Anonymous API key sent with every request
    pub anon_key: String,
}

/// Text generation backend settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// OpenAI-compatible server base URL
    pub base_url: String,
    /// Bearer API key
    pub api_key: String,
    /// Model name for completions
    pub model: String,
}

/// Where session tokens are kept between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Persistent JSON file (default)
    File,
    /// In-memory only, discarded on exit
    Memory,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

impl std::str::FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            _ => Err(format!("Unknown session kind: {}", s)),
        }
    }
}

/// Session storage settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub kind: SessionKind,
    /// File path override; None means the platform data dir
    pub path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            kind: SessionKind::File,
            path: None,
        }
    }
}

/// Resolved application configuration
///
/// `store` and `ai` are `None` when their section didn't fully resolve;
/// callers degrade (no remote data, deterministic insights) rather than
/// probing the environment themselves.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub store: Option<StoreConfig>,
    pub ai: Option<AiConfig>,
    pub session: SessionConfig,
}

impl Config {
    /// Resolve configuration from the default file location and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Resolve configuration with an explicit config file path
    ///
    /// A missing explicit file is an error; a missing default-location file
    /// just means the file layer contributes nothing.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let raw = match path {
            Some(p) => {
                let content = fs::read_to_string(p).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", p.display(), e))
                })?;
                parse_raw(&content)?
            }
            None => match default_config_path() {
                Some(p) if p.exists() => {
                    let content = fs::read_to_string(&p).map_err(|e| {
                        Error::Config(format!("Failed to read {}: {}", p.display(), e))
                    })?;
                    parse_raw(&content)?
                }
                _ => RawConfig::default(),
            },
        };

        Ok(Self::resolve(raw, &EnvOverlay::from_env()))
    }

    /// Apply the env overlay on top of the file layer and defaults
    fn resolve(raw: RawConfig, env: &EnvOverlay) -> Self {
        let file_store = raw.store.unwrap_or_default();
        let store_url = env.store_url.clone().or(file_store.url);
        let store_key = env.store_anon_key.clone().or(file_store.anon_key);
        let store = match (store_url, store_key) {
            (Some(url), Some(anon_key)) => Some(StoreConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            _ => None,
        };

        let file_ai = raw.ai.unwrap_or_default();
        let ai_url = env.ai_base_url.clone().or(file_ai.base_url);
        let ai_key = env.ai_api_key.clone().or(file_ai.api_key);
        let ai_model = env
            .ai_model
            .clone()
            .or(file_ai.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let ai = match (ai_url, ai_key) {
            (Some(base_url), Some(api_key)) => Some(AiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                model: ai_model,
            }),
            _ => None,
        };

        let file_session = raw.session.unwrap_or_default();
        let kind = file_session
            .kind
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(SessionKind::File);
        let path = env
            .session_file
            .clone()
            .or(file_session.path.map(PathBuf::from));

        Self {
            store,
            ai,
            session: SessionConfig { kind, path },
        }
    }
}

/// Default config file path (~/.config/tally/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tally").join("config.toml"))
}

/// Environment variable layer, read in one place
struct EnvOverlay {
    store_url: Option<String>,
    store_anon_key: Option<String>,
    ai_base_url: Option<String>,
    ai_api_key: Option<String>,
    ai_model: Option<String>,
    session_file: Option<PathBuf>,
}

impl EnvOverlay {
    fn from_env() -> Self {
        Self {
            store_url: non_empty_var("SUPABASE_URL"),
            store_anon_key: non_empty_var("SUPABASE_ANON_KEY"),
            ai_base_url: non_empty_var("OPENAI_BASE_URL"),
            ai_api_key: non_empty_var("OPENAI_API_KEY"),
            ai_model: non_empty_var("OPENAI_MODEL"),
            session_file: non_empty_var("TALLY_SESSION_FILE").map(PathBuf::from),
        }
    }

    fn empty() -> Self {
        Self {
            store_url: None,
            store_anon_key: None,
            ai_base_url: None,
            ai_api_key: None,
            ai_model: None,
            session_file: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Raw config structure for TOML parsing
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    store: Option<RawStore>,
    ai: Option<RawAi>,
    session: Option<RawSession>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStore {
    url: Option<String>,
    anon_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAi {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSession {
    kind: Option<String>,
    path: Option<String>,
}

fn parse_raw(content: &str) -> Result<RawConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_empty_is_unconfigured() {
        let config = Config::resolve(RawConfig::default(), &EnvOverlay::empty());
        assert!(config.store.is_none());
        assert!(config.ai.is_none());
        assert_eq!(config.session.kind, SessionKind::File);
    }

    #[test]
    fn test_resolve_from_file_layer() {
        let raw = parse_raw(
            r#"
            [store]
            url = "https://example.supabase.co/"
            anon_key = "anon-123"

            [ai]
            base_url = "https://api.openai.com"
            api_key = "sk-test"

            [session]
            kind = "memory"
            "#,
        )
        .unwrap();

        let config = Config::resolve(raw, &EnvOverlay::empty());
        let store = config.store.unwrap();
        assert_eq!(store.url, "https://example.supabase.co");
        assert_eq!(store.anon_key, "anon-123");

        let ai = config.ai.unwrap();
        assert_eq!(ai.base_url, "https://api.openai.com");
        assert_eq!(ai.model, DEFAULT_MODEL);
        assert_eq!(config.session.kind, SessionKind::Memory);
    }

    #[test]
    fn test_env_wins_over_file() {
        let raw = parse_raw(
            r#"
            [ai]
            base_url = "https://file.example.com"
            api_key = "file-key"
            model = "file-model"
            "#,
        )
        .unwrap();

        let mut env = EnvOverlay::empty();
        env.ai_base_url = Some("https://env.example.com".to_string());
        env.ai_model = Some("env-model".to_string());

        let ai = Config::resolve(raw, &env).ai.unwrap();
        assert_eq!(ai.base_url, "https://env.example.com");
        assert_eq!(ai.api_key, "file-key");
        assert_eq!(ai.model, "env-model");
    }

    #[test]
    fn test_half_configured_ai_is_absent() {
        let raw = parse_raw(
            r#"
            [ai]
            base_url = "https://api.openai.com"
            "#,
        )
        .unwrap();

        let config = Config::resolve(raw, &EnvOverlay::empty());
        assert!(config.ai.is_none(), "API key missing, section must be absent");
    }

    #[test]
    fn test_half_configured_store_is_absent() {
        let raw = parse_raw(
            r#"
            [store]
            anon_key = "anon-123"
            "#,
        )
        .unwrap();

        let config = Config::resolve(raw, &EnvOverlay::empty());
        assert!(config.store.is_none());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = parse_raw("store = not valid").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
