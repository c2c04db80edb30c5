use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::AxisError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AxisConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub microsite: MicrositeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    /// API Gateway stage URL, without a trailing slash.
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001".to_string(),
            // Brief generation runs a multi-prompt pipeline; the gateway allows 300s.
            timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 15,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MicrositeConfig {
    /// Public origin the interviewee links are built against.
    pub origin: String,
    pub max_facts: usize,
    pub max_questions: usize,
}

impl Default for MicrositeConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            max_facts: 5,
            max_questions: 5,
        }
    }
}

impl AxisConfig {
    /// Load from an optional TOML file, then apply `AXIS__SECTION__KEY` env overrides.
    pub fn load(path: &str) -> Result<Self, AxisError> {
        Self::load_with_env(path, Environment::with_prefix("AXIS").separator("__"))
    }

    fn load_with_env(path: &str, env: Environment) -> Result<Self, AxisError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(env)
            .build()?;
        Ok(s.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = AxisConfig::load("/nonexistent/axis-config-for-test").unwrap();
        assert_eq!(config.polling.interval_seconds, 15);
        assert_eq!(config.microsite.max_facts, 5);
        assert_eq!(config.microsite.max_questions, 5);
        assert_eq!(config.service.log_level, "info");
    }

    #[test]
    fn test_toml_file_overrides_sections() {
        let dir = std::env::temp_dir().join(format!("axis-config-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("axis.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "[api]\nbase_url = \"https://abc.execute-api.us-east-1.amazonaws.com/prod\"\ntimeout_seconds = 60\n\n[polling]\ninterval_seconds = 5"
        )
        .unwrap();

        let config = AxisConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(
            config.api.base_url,
            "https://abc.execute-api.us-east-1.amazonaws.com/prod"
        );
        assert_eq!(config.api.timeout_seconds, 60);
        assert_eq!(config.polling.interval_seconds, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.microsite.max_questions, 5);

        std::fs::remove_dir_all(&dir).ok();
    }

    fn write_toml(name: &str, contents: &str) -> (std::path::PathBuf, String) {
        let dir = std::env::temp_dir().join(format!("axis-config-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("axis.toml");
        std::fs::write(&path, contents).unwrap();
        let path_str = path.to_str().unwrap().to_string();
        (dir, path_str)
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let (dir, path) = write_toml(
            "partial",
            "[api]\nbase_url = \"https://abc.execute-api.us-east-1.amazonaws.com/prod\"\n",
        );

        let config = AxisConfig::load(&path).unwrap();
        assert_eq!(
            config.api.base_url,
            "https://abc.execute-api.us-east-1.amazonaws.com/prod"
        );
        assert_eq!(config.api.timeout_seconds, 300);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_single_env_override() {
        let mut vars = config::Map::new();
        vars.insert(
            "AXIS__API__BASE_URL".to_string(),
            "https://staging.example.edu".to_string(),
        );
        let env = Environment::with_prefix("AXIS")
            .separator("__")
            .source(Some(vars));

        let config =
            AxisConfig::load_with_env("/nonexistent/axis-config-for-test", env).unwrap();
        assert_eq!(config.api.base_url, "https://staging.example.edu");
        assert_eq!(config.api.timeout_seconds, 300);
        assert_eq!(config.polling.interval_seconds, 15);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let (dir, path) = write_toml("malformed", "[api\nbase_url = ");
        let err = AxisConfig::load(&path).unwrap_err();
        assert!(matches!(err, AxisError::Config(_)), "got {:?}", err);
        std::fs::remove_dir_all(&dir).ok();
    }
}
