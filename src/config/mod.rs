use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub transform: TransformConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub accept: String,
    pub request_timeout_secs: u64,
    pub cookie_store: bool,
}

/// Paths of the auth endpoints, relative to the API base url
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub login_path: String,
    pub refresh_path: String,
    pub logout_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    pub log_unresolved_relationships: bool,
    /// Extra descriptor files loaded next to the built-in kwai descriptors
    pub schema_files: Vec<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("KWAI_API_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("KWAI_API_ACCEPT") {
            self.api.accept = v;
        }
        if let Ok(v) = env::var("KWAI_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("KWAI_API_COOKIE_STORE") {
            self.api.cookie_store = v.parse().unwrap_or(self.api.cookie_store);
        }

        // Auth overrides
        if let Ok(v) = env::var("KWAI_AUTH_LOGIN_PATH") {
            self.auth.login_path = v;
        }
        if let Ok(v) = env::var("KWAI_AUTH_REFRESH_PATH") {
            self.auth.refresh_path = v;
        }
        if let Ok(v) = env::var("KWAI_AUTH_LOGOUT_PATH") {
            self.auth.logout_path = v;
        }

        // Transform overrides
        if let Ok(v) = env::var("KWAI_LOG_UNRESOLVED") {
            self.transform.log_unresolved_relationships =
                v.parse().unwrap_or(self.transform.log_unresolved_relationships);
        }
        if let Ok(v) = env::var("KWAI_SCHEMA_FILES") {
            self.transform.schema_files = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                accept: "application/vnd.api+json".to_string(),
                request_timeout_secs: 30,
                cookie_store: true,
            },
            auth: AuthConfig::default(),
            transform: TransformConfig {
                log_unresolved_relationships: true,
                schema_files: Vec::new(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                accept: "application/vnd.api+json".to_string(),
                request_timeout_secs: 15,
                cookie_store: true,
            },
            auth: AuthConfig::default(),
            transform: TransformConfig {
                log_unresolved_relationships: true,
                schema_files: Vec::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "http://localhost:8000/api".to_string(),
                accept: "application/vnd.api+json".to_string(),
                request_timeout_secs: 10,
                cookie_store: true,
            },
            auth: AuthConfig::default(),
            transform: TransformConfig {
                log_unresolved_relationships: false,
                schema_files: Vec::new(),
            },
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: "/v1/auth/login".to_string(),
            refresh_path: "/v1/auth/access_token".to_string(),
            logout_path: "/v1/auth/logout".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
