use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "HERALD_ENV";
const CONFIG_DIR_ENV: &str = "HERALD_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub bookinfo: BookInfoSettings,
    #[serde(default)]
    pub oauth: OAuthSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                // Default to repo root `config` directory.
                std::env::current_dir()
                    .map(|cwd| cwd.join("config"))
                    .expect("unable to resolve current directory")
            });

        let base_path = config_dir.join("base.toml");
        let environment_filename = format!("{}.toml", environment);
        let environment_path = config_dir.join(environment_filename);

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(config::Environment::with_prefix("HERALD").separator("_"));

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // Override environment field with parsed enum variant.
        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

/// Location of the downstream book-info service.
#[derive(Debug, Clone, Deserialize)]
pub struct BookInfoSettings {
    #[serde(default = "BookInfoSettings::default_base_url")]
    pub base_url: String,
}

impl BookInfoSettings {
    fn default_base_url() -> String {
        "http://127.0.0.1:8081".to_string()
    }
}

impl Default for BookInfoSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
        }
    }
}

/// Client-credentials registration used when calling the book-info service.
///
/// When `enabled` is false the greeting flow skips token acquisition and
/// calls the downstream service anonymously.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "OAuthSettings::default_registration")]
    pub registration: String,
    #[serde(default = "OAuthSettings::default_principal")]
    pub principal: String,
    #[serde(default = "OAuthSettings::default_token_url")]
    pub token_url: String,
    #[serde(default = "OAuthSettings::default_client_id")]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scope: Option<String>,
}

impl OAuthSettings {
    fn default_registration() -> String {
        "keycloak".to_string()
    }

    fn default_principal() -> String {
        "greeting-service".to_string()
    }

    fn default_token_url() -> String {
        "http://127.0.0.1:8083/realms/master/protocol/openid-connect/token".to_string()
    }

    fn default_client_id() -> String {
        "greeting-service".to_string()
    }
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            registration: Self::default_registration(),
            principal: Self::default_principal(),
            token_url: Self::default_token_url(),
            client_id: Self::default_client_id(),
            client_secret: String::new(),
            scope: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_bookinfo_base_url_is_localhost() {
        let settings = Settings::default();
        assert_eq!(settings.bookinfo.base_url, "http://127.0.0.1:8081");
    }

    #[test]
    fn oauth_is_disabled_by_default() {
        let settings = Settings::default();
        assert!(!settings.oauth.enabled);
        assert_eq!(settings.oauth.registration, "keycloak");
        assert_eq!(settings.oauth.principal, "greeting-service");
    }

    #[test]
    fn default_log_format_is_pretty() {
        let settings = Settings::default();
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }
}
