//! Core configuration and shared content for RiskSight.

mod config;
mod template;

pub use config::{
    AnalysisDefaults, ApiConfig, Config, ExportConfig, ProgressConfig, UploadConfig,
    ENV_API_BASE_URL, ENV_API_KEY,
};
pub use template::TEMPLATE_CONTENT;
