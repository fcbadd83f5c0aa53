use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Quiet window before a profile edit is persisted.
    pub autosave_debounce: Duration,
    /// Raster width of exported pages. 1240px is A4 at 150 dpi.
    pub export_page_width_px: u32,
    pub export_timeout: Duration,
    /// Extra fonts for rasterization, on top of the system fonts.
    pub font_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            autosave_debounce: Duration::from_millis(parse_env("AUTOSAVE_DEBOUNCE_MS", 1500)?),
            export_page_width_px: parse_env("EXPORT_PAGE_WIDTH_PX", 1240)?,
            export_timeout: Duration::from_secs(parse_env("EXPORT_TIMEOUT_SECS", 60)?),
            font_dir: std::env::var("FONT_DIR")
                .ok()
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/vitae_test".to_string(),
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            autosave_debounce: Duration::from_millis(50),
            export_page_width_px: 300,
            export_timeout: Duration::from_secs(30),
            font_dir: None,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u32 = parse_env("VITAE_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_require_env_reports_missing_key() {
        let err = require_env("VITAE_TEST_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("VITAE_TEST_MISSING_KEY"));
    }
}
