//! # Planik Client
//!
//! 面向调用方的规划客户端。
//!
//! [`PlannerClient`] 把编码器、障碍物序列化和请求桥接组合成两个
//! 公开操作：
//!
//! - [`PlannerClient::solve_for_pose`]: 单点（IK）求解
//! - [`PlannerClient::solve_trajectory`]: 轨迹求解
//!
//! 关节名序、求解器选项和障碍物集合在每次编码时从协作组件现取；
//! 临时位姿由调用方显式传入，客户端自身不累积任何跨调用状态。

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod types;

// 重新导出常用类型
pub use client::{PlannerClient, PlannerClientBuilder};
pub use config::ClientConfig;
pub use error::ClientError;
pub use model::{
    NullStatusReporter, ObstacleSource, PlanningModel, StaticWorld, StatusReporter,
};
pub use types::{IkSolution, PlannedTrajectory, PoseRefs};
