//! 在途调用表
//!
//! 每个在途调用在表里占一个槽：关联 ID → 一次性响应发送端。
//! 槽在发布前登记、在解析或调用退出时移除，绝不复用；解析或
//! 清理某个槽不会触碰其他调用的槽。

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use planik_protocol::PlanResponse;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 在途调用表（跨线程共享）
#[derive(Default)]
pub(crate) struct PendingTable {
    slots: Mutex<HashMap<u64, Sender<PlanResponse>>>,
}

impl PendingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 登记一个在途调用槽
    fn insert(&self, request_id: u64, slot: Sender<PlanResponse>) {
        self.slots.lock().insert(request_id, slot);
    }

    /// 按关联 ID 解析：命中则移除槽并投递响应
    ///
    /// 槽移除后同一 ID 的后续响应自然落空——每次调用至多消费
    /// 一条响应。返回是否命中。
    pub(crate) fn resolve(&self, request_id: u64, response: PlanResponse) -> bool {
        let slot = self.slots.lock().remove(&request_id);
        match slot {
            Some(slot) => {
                // 容量为 1 的通道，发送不会阻塞；调用方已放弃时忽略
                let _ = slot.try_send(response);
                true
            },
            None => {
                debug!(request_id, "no pending call for response (duplicate or late)");
                false
            },
        }
    }

    /// 移除槽（幂等）
    fn remove(&self, request_id: u64) {
        self.slots.lock().remove(&request_id);
    }

    /// 当前在途调用数
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }
}

/// 在途调用槽的 RAII 守卫
///
/// 无论调用以解析、超时还是传输错误退出，Drop 都会把槽从表里
/// 摘掉——监听器清理在每条退出路径上都成立，且幂等。
pub(crate) struct PendingGuard {
    table: Arc<PendingTable>,
    request_id: u64,
}

impl PendingGuard {
    /// 登记槽并返回守卫
    pub(crate) fn register(
        table: Arc<PendingTable>,
        request_id: u64,
        slot: Sender<PlanResponse>,
    ) -> Self {
        table.insert(request_id, slot);
        Self { table, request_id }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.table.remove(self.request_id);
    }
}
