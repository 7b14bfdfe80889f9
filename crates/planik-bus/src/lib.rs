//! # Planik Bus
//!
//! 消息总线抽象层，提供统一的发布/订阅接口。
//!
//! 真实部署里总线由外部消息系统提供（按通道至少一次、有序投递）；
//! 本 crate 只定义桥接层消费的接口，外加一个进程内实现
//! [`MemoryBus`]，供测试和单进程嵌入使用。

use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryBus;

/// 总线层统一错误类型
#[derive(Error, Debug)]
pub enum BusError {
    /// 底层 IO 错误
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    /// 总线已关闭（投递上下文退出）
    #[error("Bus closed")]
    Closed,

    /// 非法通道名（空字符串）
    #[error("Invalid channel name: {0:?}")]
    InvalidChannel(String),
}

/// 订阅句柄
///
/// 由 [`MessageBus::subscribe`] 返回，传给
/// [`MessageBus::unsubscribe`] 撤销订阅。字段公开，便于外部
/// 总线后端实现 [`MessageBus`] 时自行分配句柄。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// 消息回调 Trait
///
/// 在总线的投递上下文里被调用。
///
/// # 性能要求
///
/// 回调必须快速返回，禁止在回调里做阻塞等待；需要慢处理时
/// 用 `try_send` 把消息丢进自己的 Channel 异步消化。
pub trait MessageHandler: Send + Sync {
    /// 收到一条消息时调用
    ///
    /// # 参数
    ///
    /// - `channel`: 消息所在通道
    /// - `payload`: 消息内容（编码格式由上层约定）
    fn on_message(&self, channel: &str, payload: &[u8]);
}

/// 消息总线 Trait
///
/// 语义约定：
/// - 按通道至少一次、有序投递；跨通道无顺序保证
/// - `subscribe` 返回后，后续发布的消息保证可见
/// - `unsubscribe` 幂等，重复撤销同一句柄无副作用
pub trait MessageBus: Send + Sync {
    /// 向通道发布一条消息
    fn publish(&self, channel: &str, payload: Bytes) -> Result<(), BusError>;

    /// 订阅通道
    fn subscribe(
        &self,
        channel: &str,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionId, BusError>;

    /// 撤销订阅（幂等）
    fn unsubscribe(&self, id: SubscriptionId);
}
