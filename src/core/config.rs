//! Configuration management for RiskSight.
//!
//! Handles loading and saving configuration from TOML files, with the
//! service endpoint and token overridable from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding `api.base_url`.
pub const ENV_API_BASE_URL: &str = "RISKSIGHT_API_BASE_URL";

/// Environment variable overriding `api.api_key`.
pub const ENV_API_KEY: &str = "RISKSIGHT_API_KEY";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Analysis service connection
    pub api: ApiConfig,

    /// Upload settings
    pub upload: UploadConfig,

    /// Defaults for the analysis form
    pub analysis: AnalysisDefaults,

    /// Cosmetic progress display
    pub progress: ProgressConfig,

    /// Export settings
    pub export: ExportConfig,
}

/// Analysis service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the service, including any version prefix
    pub base_url: String,

    /// Static bearer token attached to every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Transport timeout in seconds (none when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// User agent sent with requests
    pub user_agent: String,
}

/// Upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Server-side size limit sent with extraction requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_mb: Option<u32>,
}

/// Defaults applied to the analysis form when flags are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Document type (meeting_transcript, business_plan)
    pub document_type: String,

    /// Industry (technology, finance, healthcare, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    /// Company scale (startup, small, medium, enterprise)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_scale: Option<String>,

    /// Focus area, empty for none
    pub analysis_focus: String,

    /// Whether to attach the original file to the analyze request
    pub attach_file: bool,
}

/// Progress ticker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Whether to show progress at all
    pub enabled: bool,

    /// Tick interval while extracting, in milliseconds
    pub extraction_interval_ms: u64,

    /// Largest random step while extracting, in percent
    pub extraction_max_step: f32,

    /// Tick interval while analyzing, in milliseconds
    pub analysis_interval_ms: u64,

    /// Largest random step while analyzing, in percent
    pub analysis_max_step: f32,

    /// Progress never passes this value before the call resolves
    pub cap: f32,
}

/// Export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exports are written to (current directory when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.risksight.toml` in current directory
    /// 2. `~/.config/risksight/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let local_config = PathBuf::from(".risksight.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = Self::config_dir() {
            let global_config = config_dir.join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first, if present.
    pub fn apply_env(&mut self) {
        let _ = dotenvy::dotenv();
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
    }

    /// Save configuration to the global config file.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;

        Ok(config_path)
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("risksight"))
    }

    /// Resolve an export file name against the configured output directory.
    pub fn export_path(&self, file_name: &str) -> PathBuf {
        match &self.export.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

impl ApiConfig {
    /// Transport timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Whether a token is available.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            api_key: None,
            timeout_secs: None,
            user_agent: format!("risksight/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_size_mb: Some(10) }
    }
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            document_type: "meeting_transcript".to_string(),
            industry: None,
            company_scale: None,
            analysis_focus: String::new(),
            attach_file: true,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extraction_interval_ms: 200,
            extraction_max_step: 15.0,
            analysis_interval_ms: 300,
            analysis_max_step: 10.0,
            cap: 90.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.document_type, "meeting_transcript");
        assert!(config.analysis.attach_file);
        assert_eq!(config.upload.max_size_mb, Some(10));
        assert!(config.api.api_key.is_none());
        assert!(config.api.timeout().is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[analysis]"));
        assert!(!toml_str.contains("api_key"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [api]
            base_url = "https://risk.example.com/api/v1"
            timeout_secs = 120

            [analysis]
            industry = "retail"
            company_scale = "small"
            attach_file = false

            [progress]
            enabled = false
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "https://risk.example.com/api/v1");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.analysis.industry.as_deref(), Some("retail"));
        assert_eq!(config.analysis.document_type, "meeting_transcript");
        assert!(!config.analysis.attach_file);
        assert!(!config.progress.enabled);
        assert_eq!(config.progress.cap, 90.0);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_API_BASE_URL, "https://api.example.com/api/v1"),
            (ENV_API_KEY, "secret-token"),
        ]);

        let mut config = Config::default();
        config.apply_env_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.example.com/api/v1");
        assert_eq!(config.api.api_key.as_deref(), Some("secret-token"));
        assert!(config.api.has_api_key());
    }

    #[test]
    #[serial]
    fn test_apply_env_reads_process_environment() {
        std::env::set_var(ENV_API_BASE_URL, "https://env.example.com/api/v1");
        std::env::set_var(ENV_API_KEY, "env-token");

        let mut config = Config::default();
        config.apply_env();

        std::env::remove_var(ENV_API_BASE_URL);
        std::env::remove_var(ENV_API_KEY);

        assert_eq!(config.api.base_url, "https://env.example.com/api/v1");
        assert_eq!(config.api.api_key.as_deref(), Some("env-token"));
    }

    #[test]
    #[serial]
    fn test_apply_env_without_variables() {
        std::env::remove_var(ENV_API_BASE_URL);
        std::env::remove_var(ENV_API_KEY);

        let mut config = Config::default();
        config.apply_env();
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
        assert!(!config.api.has_api_key());
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env_from(|_| Some("  ".to_string()));
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
        assert!(config.api.api_key.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[export]\noutput_dir = \"reports\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.export_path("a.json"), PathBuf::from("reports").join("a.json"));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
