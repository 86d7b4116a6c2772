use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "phrase-coach.toml";
const CONFIG_PATH_VAR: &str = "PHRASE_COACH_CONFIG";
const ENV_PREFIX: &str = "PHRASE_COACH_";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PracticeConfig {
    /// Language the practice phrases are written in.
    pub language: String,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub gemini: LLMConfig,
    pub practice: PracticeConfig,
}

pub struct ConfigService;

impl ConfigService {
    /// Defaults, then the TOML file, then `PHRASE_COACH_*` variables
    /// (`__` separates nested keys), then `GEMINI_API_KEY` and `PORT`.
    pub fn figment() -> Figment {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["CONFIG"]).split("__"))
            .merge(
                Env::raw()
                    .only(&["GEMINI_API_KEY"])
                    .map(|_| "gemini.api_key".into()),
            )
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
    }

    pub fn load() -> Result<AppConfig> {
        Ok(Self::figment().extract()?)
    }
}
