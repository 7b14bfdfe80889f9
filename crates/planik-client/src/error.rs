//! 客户端错误类型定义

use planik_bridge::BridgeError;
use planik_protocol::EncodeError;
use thiserror::Error;

/// 客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    /// 桥接层错误（超时、传输失败等）
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// 请求编码失败
    #[error("encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// 配置文件读取失败
    #[error("config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// 配置解析失败
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Builder 缺少必要组件
    #[error("missing required component: {0}")]
    Missing(&'static str),
}

impl ClientError {
    /// 是否为超时结果
    ///
    /// 超时与求解失败是两种结果，调用方常需要区分对待。
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Bridge(BridgeError::Timeout(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_is_timeout() {
        let err = ClientError::Bridge(BridgeError::Timeout(Duration::from_secs(12)));
        assert!(err.is_timeout());

        let err = ClientError::Missing("bus");
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_from_bridge_error() {
        let err: ClientError = BridgeError::Closed.into();
        assert!(matches!(err, ClientError::Bridge(BridgeError::Closed)));
    }
}
