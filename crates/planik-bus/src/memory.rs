//! 进程内消息总线
//!
//! 发布的消息先进无界队列，由后台投递线程逐条分发给订阅者——
//! 回调始终跑在独立的投递上下文上，与发布方解耦，语义上贴近
//! 真实消息系统的异步投递。同一通道内保持发布顺序。

use crate::{BusError, MessageBus, MessageHandler, SubscriptionId};
use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::mem::ManuallyDrop;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;
use tracing::{error, trace};

/// 投递队列里的一条消息
struct Envelope {
    channel: String,
    payload: Bytes,
}

/// 订阅注册表（投递线程与 API 线程共享）
#[derive(Default)]
struct Registry {
    subs: RwLock<HashMap<String, Vec<(SubscriptionId, Arc<dyn MessageHandler>)>>>,
}

impl Registry {
    /// 取某通道当前的全部回调（克隆出来，避免投递时持锁）
    fn handlers_for(&self, channel: &str) -> Vec<Arc<dyn MessageHandler>> {
        self.subs
            .read()
            .get(channel)
            .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }
}

/// 进程内消息总线
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bytes::Bytes;
/// use planik_bus::{MemoryBus, MessageBus, MessageHandler};
///
/// struct Printer;
/// impl MessageHandler for Printer {
///     fn on_message(&self, channel: &str, payload: &[u8]) {
///         println!("{}: {} bytes", channel, payload.len());
///     }
/// }
///
/// let bus = MemoryBus::new();
/// bus.subscribe("STATUS", Arc::new(Printer)).unwrap();
/// bus.publish("STATUS", Bytes::from_static(b"ok")).unwrap();
/// ```
pub struct MemoryBus {
    registry: Arc<Registry>,
    /// 投递队列发送端
    ///
    /// Drop 时需要 **先关闭队列**（在 join 投递线程之前），
    /// 否则投递线程永远收不到 `Disconnected` 而卡住退出。
    tx: ManuallyDrop<Sender<Envelope>>,
    /// 投递线程句柄（Drop 时 join）
    delivery: Option<JoinHandle<()>>,
    /// 订阅句柄分配计数
    next_id: AtomicU64,
}

impl MemoryBus {
    /// 创建总线并启动投递线程
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        let registry = Arc::new(Registry::default());
        let registry_clone = registry.clone();

        let delivery = std::thread::spawn(move || {
            delivery_loop(rx, registry_clone);
        });

        Self {
            registry,
            tx: ManuallyDrop::new(tx),
            delivery: Some(delivery),
            next_id: AtomicU64::new(0),
        }
    }

    fn check_channel(channel: &str) -> Result<(), BusError> {
        if channel.is_empty() {
            return Err(BusError::InvalidChannel(channel.to_string()));
        }
        Ok(())
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus for MemoryBus {
    fn publish(&self, channel: &str, payload: Bytes) -> Result<(), BusError> {
        Self::check_channel(channel)?;
        trace!(channel, len = payload.len(), "publish");
        self.tx
            .send(Envelope {
                channel: channel.to_string(),
                payload,
            })
            .map_err(|_| BusError::Closed)
    }

    fn subscribe(
        &self,
        channel: &str,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<SubscriptionId, BusError> {
        Self::check_channel(channel)?;
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.registry
            .subs
            .write()
            .entry(channel.to_string())
            .or_default()
            .push((id, handler));
        trace!(channel, ?id, "subscribe");
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.registry.subs.write();
        for entries in subs.values_mut() {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }
}

impl Drop for MemoryBus {
    fn drop(&mut self) {
        // 先断开队列，让投递线程自然退出
        unsafe {
            ManuallyDrop::drop(&mut self.tx);
        }
        if let Some(handle) = self.delivery.take()
            && handle.join().is_err()
        {
            error!("delivery thread panicked");
        }
    }
}

/// 投递线程循环：队列排空即退出
fn delivery_loop(rx: Receiver<Envelope>, registry: Arc<Registry>) {
    for envelope in rx.iter() {
        for handler in registry.handlers_for(&envelope.channel) {
            handler.on_message(&envelope.channel, &envelope.payload);
        }
    }
}
