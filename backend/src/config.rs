use std::env;
use std::path::PathBuf;

/// Placeholder key shipped in sample env files; treated as "no key".
pub const PLACEHOLDER_WEATHER_KEY: &str = "your-api-key-here";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    pub weather_api_key: Option<String>,
    pub weather_api_url: String,

    pub data_file: PathBuf,
    pub frontend_dir: PathBuf,

    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            weather_api_key: None,
            weather_api_url: "https://api.openweathermap.org".into(),
            data_file: PathBuf::from("data/moods.json"),
            frontend_dir: PathBuf::from("frontend"),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_port(env::var("PORT").ok(), defaults.port)?,

            weather_api_key: normalize_api_key(env::var("WEATHER_API_KEY").ok()),
            weather_api_url: env::var("WEATHER_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.weather_api_url),

            data_file: env::var("DATA_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_file),
            frontend_dir: env::var("FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.frontend_dir),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or_default(),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Trimmed key, or `None` when it is blank or still the sample placeholder.
pub fn normalize_api_key(raw: Option<String>) -> Option<String> {
    raw.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != PLACEHOLDER_WEATHER_KEY)
}

fn parse_port(raw: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name: "PORT", value }),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
