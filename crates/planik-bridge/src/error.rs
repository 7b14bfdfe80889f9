//! 桥接层错误类型定义

use planik_bus::BusError;
use planik_protocol::EncodeError;
use std::time::Duration;
use thiserror::Error;

/// 桥接层错误类型
///
/// 四类结果互不混淆：超时不是求解失败，传输错误不重试，
/// 编码错误发生在发布之前。
#[derive(Error, Debug)]
pub enum BridgeError {
    /// 截止时间内没有等到匹配的响应
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// 传输层失败（发布或订阅出错）
    #[error("transport error: {0}")]
    Transport(#[from] BusError),

    /// 请求编码失败（发生在发布之前，不会发出半成品请求）
    #[error("request encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// 响应通路已关闭
    #[error("response channel closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 测试 BridgeError 的 Display 实现
    #[test]
    fn test_bridge_error_display() {
        let err = BridgeError::Timeout(Duration::from_millis(1500));
        assert!(format!("{}", err).contains("1.5s"));

        let err = BridgeError::Closed;
        assert_eq!(format!("{}", err), "response channel closed");
    }

    /// 测试 From<BusError> 转换
    #[test]
    fn test_from_bus_error() {
        let err: BridgeError = BusError::Closed.into();
        assert!(matches!(err, BridgeError::Transport(BusError::Closed)));
    }

    /// 测试 From<EncodeError> 转换
    #[test]
    fn test_from_encode_error() {
        let err: BridgeError = EncodeError::MissingJointNames.into();
        assert!(matches!(
            err,
            BridgeError::Encode(EncodeError::MissingJointNames)
        ));
    }
}
