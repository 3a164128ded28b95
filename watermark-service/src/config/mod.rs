use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::path::{Path, PathBuf};
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
pub struct WatermarkConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default)]
    pub logo: LogoSettings,
    #[serde(default)]
    pub qr: QrSettings,
    #[serde(default)]
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogoSettings {
    /// Relative paths are resolved against the service directory.
    #[serde(default = "default_logo_path")]
    pub path: PathBuf,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            path: default_logo_path(),
        }
    }
}

fn default_logo_path() -> PathBuf {
    PathBuf::from("assets/logo.png")
}

/// QR rendering parameters, fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QrSettings {
    /// Smallest symbol version tried; larger payloads grow the symbol.
    #[validate(range(min = 1, max = 40))]
    #[serde(default = "default_version")]
    pub version: i16,
    #[serde(default)]
    pub error_correction: ErrorCorrection,
    /// Pixels per module edge.
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_box_size")]
    pub box_size: u32,
    /// Quiet zone width in modules.
    #[validate(range(max = 16))]
    #[serde(default = "default_border")]
    pub border: u32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            error_correction: ErrorCorrection::default(),
            box_size: default_box_size(),
            border: default_border(),
        }
    }
}

fn default_version() -> i16 {
    1
}

fn default_box_size() -> u32 {
    10
}

fn default_border() -> u32 {
    4
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    #[serde(rename = "L", alias = "l")]
    Low,
    #[serde(rename = "M", alias = "m")]
    Medium,
    #[serde(rename = "Q", alias = "q")]
    Quartile,
    #[default]
    #[serde(rename = "H", alias = "h")]
    High,
}

impl std::fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            ErrorCorrection::Low => "L",
            ErrorCorrection::Medium => "M",
            ErrorCorrection::Quartile => "Q",
            ErrorCorrection::High => "H",
        };
        f.write_str(level)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

impl WatermarkConfig {
    pub fn load() -> Result<Self, AppError> {
        let service_dir = service_directory();
        let mut config: WatermarkConfig = core_config::load_from(&service_dir.join("config"))?;

        if config.logo.path.is_relative() {
            config.logo.path = service_dir.join(&config.logo.path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.qr.validate().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid QR settings: {}", e))
        })
    }
}

/// The binary may be started from the workspace root or from the crate.
fn service_directory() -> PathBuf {
    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_service_directory(&base_path)
}

fn resolve_service_directory(base_path: &Path) -> PathBuf {
    if base_path.ends_with("watermark-service") {
        base_path.to_path_buf()
    } else {
        base_path.join("watermark-service")
    }
}
