//! # Planik SDK
//!
//! 统一入口：把协议层、总线层、桥接层和客户端层的公开接口
//! 汇聚到一个 crate，外加日志初始化。
//!
//! # 使用场景
//!
//! 绝大多数用户只需要依赖本 crate：
//!
//! ```no_run
//! use std::sync::Arc;
//! use planik_sdk::bus::MemoryBus;
//! use planik_sdk::client::{PlannerClientBuilder, PlanningModel, PoseRefs};
//! use planik_sdk::protocol::PoseMap;
//!
//! struct Arm;
//! impl PlanningModel for Arm {
//!     fn joint_names(&self) -> Vec<String> {
//!         (1..=6).map(|i| format!("j{i}")).collect()
//!     }
//! }
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! planik_sdk::init_logging();
//!
//! let client = PlannerClientBuilder::new()
//!     .bus(Arc::new(MemoryBus::new()))
//!     .model(Arc::new(Arm))
//!     .build()?;
//!
//! let solution =
//!     client.solve_for_pose(&[], &PoseMap::new(), &PoseRefs::end_only("grasp"), None)?;
//! println!("info = {}", solution.info);
//! # Ok(())
//! # }
//! ```

pub use planik_bridge as bridge;
pub use planik_bus as bus;
pub use planik_client as client;
pub use planik_protocol as protocol;

// 常用类型的顶层快捷导出
pub use planik_bridge::{BridgeError, RequestBridge};
pub use planik_bus::MemoryBus;
pub use planik_client::{ClientConfig, ClientError, PlannerClient, PlannerClientBuilder};

use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 订阅器按 `RUST_LOG` 环境变量过滤（未设置时默认 `info`），
/// 同时桥接 `log` 宏产生的记录。重复调用安全——已经装好全局
/// 订阅器时静默跳过。
pub fn init_logging() {
    // log 桥接失败说明别人已经装过 logger，忽略即可
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
