//! 导出配置
//!
//! JSON 文件，所有字段可省略：
//!
//! ```json
//! { "tolerance": 0.01, "timeout_ms": 30000, "file_name": "floorplan.dxf" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use zplan_core::filter::{DegeneracyFilter, DEFAULT_TOLERANCE};
use zplan_core::geometry::GeometryError;
use zplan_file::DEFAULT_FILE_NAME;

/// 外部服务调用默认超时
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tolerance(#[from] GeometryError),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 导出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 退化边容差（模型长度单位）
    pub tolerance: f64,
    /// 单次外部服务调用超时（毫秒）
    pub timeout_ms: u64,
    /// 导出文件名
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl ExportConfig {
    /// 从 JSON 文件加载并校验
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filter()?;
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid("timeout_ms must be positive".to_string()));
        }
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("file_name is empty".to_string()));
        }
        Ok(())
    }

    pub fn filter(&self) -> Result<DegeneracyFilter, ConfigError> {
        Ok(DegeneracyFilter::new(self.tolerance)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
