//! 请求/响应桥接器
//!
//! 单次调用的生命周期：
//!
//! ```text
//! Idle ──publish──▶ Published ──┬──▶ Resolved   （首条匹配响应）
//!                               ├──▶ TimedOut   （截止时间到）
//!                               └──▶ Errored    （传输失败）
//!                                      │
//!                                      ▼
//!                                   Closed      （槽拆除，不复用）
//! ```
//!
//! 响应分发器在桥接器构造时就挂上响应通道——监听先于任何发布
//! 存在，响应再快也不会在监听器就位前溜走。调用级的槽在发布前
//! 登记，靠 RAII 守卫保证每条退出路径都拆干净。

use crate::error::BridgeError;
use crate::pending::{PendingGuard, PendingTable};
use bytes::Bytes;
use crossbeam_channel::{RecvTimeoutError, bounded};
use planik_bus::{MessageBus, MessageHandler, SubscriptionId};
use planik_protocol::{PlanRequest, PlanResponse, RequestKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// 响应分发器：解码响应并按关联 ID 唤醒对应调用
struct ResponseDispatcher {
    pending: Arc<PendingTable>,
}

impl MessageHandler for ResponseDispatcher {
    fn on_message(&self, channel: &str, payload: &[u8]) {
        let response = match PlanResponse::from_payload(payload) {
            Ok(response) => response,
            Err(err) => {
                // 至少一次投递的总线上可能混进无关或损坏的消息，跳过即可
                warn!(channel, %err, "undecodable response ignored");
                return;
            },
        };
        trace!(channel, request_id = response.request_id, "response received");
        self.pending.resolve(response.request_id, response);
    }
}

/// 请求/响应桥接器
///
/// 可同时服务多个并发调用：每个调用占独立的槽，解析与超时互不
/// 影响，调用之间也不互相阻塞。跨调用的响应顺序不做任何保证。
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use planik_bridge::RequestBridge;
/// use planik_bus::MemoryBus;
/// use planik_protocol::{PlanRequestBuilder, RequestKind};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let bus = Arc::new(MemoryBus::new());
/// let bridge = RequestBridge::new(bus)?;
///
/// let request = PlanRequestBuilder::new()
///     .joint_names(vec!["j1".to_string()])
///     .build()?;
/// let response = bridge.call(RequestKind::Ik, request, Duration::from_secs(12))?;
/// println!("{} states", response.valid_states().len());
/// # Ok(())
/// # }
/// ```
pub struct RequestBridge {
    bus: Arc<dyn MessageBus>,
    pending: Arc<PendingTable>,
    /// 关联 ID 分配计数（进程内单调递增）
    next_id: AtomicU64,
    /// 分发器订阅句柄（Drop 时撤销）
    subscriptions: Vec<SubscriptionId>,
}

impl RequestBridge {
    /// 创建桥接器并挂上两条响应通道的分发器
    ///
    /// # Errors
    ///
    /// - `BridgeError::Transport`: 订阅响应通道失败
    pub fn new(bus: Arc<dyn MessageBus>) -> Result<Self, BridgeError> {
        let pending = Arc::new(PendingTable::new());
        let mut subscriptions = Vec::with_capacity(RequestKind::ALL.len());

        for kind in RequestKind::ALL {
            let dispatcher = Arc::new(ResponseDispatcher {
                pending: pending.clone(),
            });
            subscriptions.push(bus.subscribe(kind.response_channel(), dispatcher)?);
        }

        Ok(Self {
            bus,
            pending,
            next_id: AtomicU64::new(0),
            subscriptions,
        })
    }

    /// 发出请求并阻塞等待匹配的响应
    ///
    /// 请求在发布时分配关联 ID；响应按 ID 配对，首条匹配的响应
    /// 满足调用，之后同 ID 的响应一律忽略。超时后调用方解除
    /// 阻塞，槽照样拆除——事后到达的响应落空，不会污染下一次
    /// 调用。
    ///
    /// # 参数
    ///
    /// - `kind`: 请求种类（决定通道对）
    /// - `request`: 编码好的请求（`request_id` 由本方法改写）
    /// - `timeout`: 本次调用愿意等待的时长
    ///
    /// # Errors
    ///
    /// - [`BridgeError::Encode`]: payload 编码失败（发生在登记监听槽之前）
    /// - [`BridgeError::Transport`]: 发布失败
    /// - [`BridgeError::Timeout`]: 截止时间内无匹配响应
    pub fn call(
        &self,
        kind: RequestKind,
        mut request: PlanRequest,
        timeout: Duration,
    ) -> Result<PlanResponse, BridgeError> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        request.request_id = request_id;

        // 编码失败在登记任何监听状态之前返回
        let payload = Bytes::from(request.to_payload()?);

        let (slot_tx, slot_rx) = bounded(1);
        let _guard = PendingGuard::register(self.pending.clone(), request_id, slot_tx);

        trace!(
            request_id,
            channel = kind.request_channel(),
            "publishing plan request"
        );
        self.bus.publish(kind.request_channel(), payload)?;

        match slot_rx.recv_timeout(timeout) {
            Ok(response) => {
                debug!(
                    request_id,
                    states = response.valid_states().len(),
                    "plan response resolved"
                );
                Ok(response)
            },
            Err(RecvTimeoutError::Timeout) => {
                warn!(request_id, ?timeout, "plan request timed out");
                Err(BridgeError::Timeout(timeout))
            },
            Err(RecvTimeoutError::Disconnected) => Err(BridgeError::Closed),
        }
        // _guard Drop：槽从表里摘除（解析路径上已摘除，Drop 幂等）
    }

    /// 当前在途调用数（诊断用）
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }
}

impl Drop for RequestBridge {
    fn drop(&mut self) {
        for id in &self.subscriptions {
            self.bus.unsubscribe(*id);
        }
    }
}
