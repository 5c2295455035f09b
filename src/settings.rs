use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::session::DEFAULT_MAX_SESSION_AGE_SECS;
use crate::users::DEFAULT_HASH_ITERATIONS;

/// Environment variable naming a directory whose `Settings.toml` overrides
/// the one in the working directory
pub const CONFIG_DIR_ENV: &str = "SESAME_CONFIG_DIR";

const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppSettings {
    pub application: ApplicationSettings,
    pub session: SessionSettings,
    pub cookies: CookieSettings,
    pub passwords: PasswordSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Idle lifetime of a session; every authenticated request restarts it
    pub max_age_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordSettings {
    /// PBKDF2 rounds for newly hashed passwords
    pub iterations: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_age_seconds: DEFAULT_MAX_SESSION_AGE_SECS,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true, // Default to secure cookies
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_HASH_ITERATIONS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from configuration files and environment variables,
    /// then initialize logging at the configured level
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A settings file exists but cannot be read or parsed
    /// - The resulting settings are invalid
    pub fn load() -> Result<Self> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        settings.validate()?;

        settings.init_logging();
        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (applied separately afterwards)
    /// 2. `Settings.toml` in `SESAME_CONFIG_DIR`
    /// 3. `Settings.toml` in the current directory
    /// 4. Defaults
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read or parsed
    pub fn load_base_settings() -> Result<Self> {
        let mut settings = Self::default();

        let default_config_path = Path::new(SETTINGS_FILE);
        if default_config_path.exists() {
            settings = Self::from_file(default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(config_dir) = std::env::var(CONFIG_DIR_ENV) {
            let config_path = Path::new(&config_dir).join(SETTINGS_FILE);
            if config_path.exists() {
                settings = Self::from_file(&config_path)?;
                println!("✓ Overriding settings from {}", config_path.display());
            } else {
                println!(
                    "ℹ {CONFIG_DIR_ENV} set but no {SETTINGS_FILE} found at: {}",
                    config_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a single TOML settings file; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        basic_toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply environment variable overrides to settings
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides(settings: &mut Self) {
        if let Ok(host) = std::env::var("HOST") {
            settings.application.host = host;
        }
        Self::apply_parsed_env_override("PORT", &mut settings.application.port);
        Self::apply_parsed_env_override(
            "SESSION_MAX_AGE_SECONDS",
            &mut settings.session.max_age_seconds,
        );
        Self::apply_parsed_env_override("COOKIE_SECURE", &mut settings.cookies.secure);
        Self::apply_parsed_env_override(
            "PASSWORD_HASH_ITERATIONS",
            &mut settings.passwords.iterations,
        );
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            settings.logging.level = log_level;
        }
    }

    fn apply_parsed_env_override<T: std::str::FromStr>(env_var: &str, target: &mut T) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.trim().parse::<T>() {
                *target = value;
            }
        }
    }

    /// Reject settings the stores cannot work with
    ///
    /// # Errors
    ///
    /// Returns an error for a zero session age or zero hash iterations
    pub fn validate(&self) -> Result<()> {
        if self.session.max_age_seconds == 0 {
            bail!("session.max_age_seconds must be greater than zero");
        }
        if self.passwords.iterations == 0 {
            bail!("passwords.iterations must be greater than zero");
        }
        Ok(())
    }

    fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.logging.level.as_str());
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            log::debug!("Logger already initialized: {e}");
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}
