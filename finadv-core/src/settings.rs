//! Application settings loaded from the environment and `.env`
//!
//! Environment variables win over `.env` entries. `settings()` returns the
//! process-wide instance; `Settings::from_lookup` builds an isolated one.

use once_cell::sync::OnceCell;

/// Used when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://finadv.db";

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const SQL_ECHO_VAR: &str = "SQL_ECHO";

static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Settings error type
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid boolean for {var}: '{value}'")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} cannot be empty")]
    Empty { var: &'static str },
}

/// Parsed settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Connection string handed to the pool and the migration runner
    pub database_url: String,
    /// Log every SQL statement at info level
    pub sql_echo: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            sql_echo: false,
        }
    }
}

impl Settings {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("ignoring unreadable .env: {}", e),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup(DATABASE_URL_VAR) {
            Some(url) if url.trim().is_empty() => {
                return Err(SettingsError::Empty {
                    var: DATABASE_URL_VAR,
                })
            }
            Some(url) => url.trim().to_string(),
            None => DEFAULT_DATABASE_URL.to_string(),
        };

        let sql_echo = match lookup(SQL_ECHO_VAR) {
            Some(value) => parse_bool(SQL_ECHO_VAR, &value)?,
            None => false,
        };

        Ok(Self {
            database_url,
            sql_echo,
        })
    }
}

/// Process-wide settings, loaded on first use.
pub fn settings() -> Result<&'static Settings, SettingsError> {
    SETTINGS.get_or_try_init(Settings::from_env)
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(SettingsError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.database_url, "sqlite://finadv.db");
        assert!(!settings.sql_echo);
    }

    #[test]
    fn reads_url_and_echo() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SQL_ECHO", "True"),
        ]))
        .unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert!(settings.sql_echo);
    }

    #[test]
    fn rejects_bad_bool() {
        let err = Settings::from_lookup(lookup(&[("SQL_ECHO", "maybe")])).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidBool { .. }));
    }

    #[test]
    fn rejects_blank_url() {
        let err = Settings::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, SettingsError::Empty { .. }));
    }
}
