//! 客户端配置

use crate::error::ClientError;
use planik_protocol::{DEFAULT_IK_TIMEOUT_MS, DEFAULT_TRAJECTORY_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 客户端配置
///
/// 两个等待时长是调用点参数的缺省来源，不是全局常量——
/// 每次求解都按当次配置取值。
///
/// # Example
///
/// ```
/// use planik_client::ClientConfig;
///
/// // 默认配置：单点 12s，轨迹 20s
/// let config = ClientConfig::default();
/// assert_eq!(config.ik_timeout_ms, 12_000);
///
/// // 从 TOML 加载（缺省字段用默认值补齐）
/// let config = ClientConfig::from_toml_str("ik_timeout_ms = 5000").unwrap();
/// assert_eq!(config.ik_timeout_ms, 5_000);
/// assert_eq!(config.trajectory_timeout_ms, 20_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 单点求解的等待时长（毫秒）
    pub ik_timeout_ms: u64,
    /// 轨迹求解的等待时长（毫秒）
    pub trajectory_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ik_timeout_ms: DEFAULT_IK_TIMEOUT_MS,
            trajectory_timeout_ms: DEFAULT_TRAJECTORY_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// 单点求解等待时长
    pub fn ik_timeout(&self) -> Duration {
        Duration::from_millis(self.ik_timeout_ms)
    }

    /// 轨迹求解等待时长
    pub fn trajectory_timeout(&self) -> Duration {
        Duration::from_millis(self.trajectory_timeout_ms)
    }

    /// 从 TOML 文本解析
    pub fn from_toml_str(text: &str) -> Result<Self, ClientError> {
        Ok(toml::from_str(text)?)
    }

    /// 从 TOML 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
