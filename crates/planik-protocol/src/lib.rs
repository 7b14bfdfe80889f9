//! # Planik Protocol
//!
//! 规划请求的线上数据模型与编码（无传输依赖）
//!
//! ## 模块
//!
//! - `tspan`: 约束有效时间窗及其归一化
//! - `constraint`: 规划约束的变体注册表与编码
//! - `pose`: 命名位姿映射、`__ndarray__` 数值数组、世界位姿
//! - `obstacle`: 障碍物描述符及其序列化
//! - `options`: 求解器选项映射
//! - `encoder`: `PlanRequestBuilder`（把各部分组装成一条请求）
//! - `request`: 请求/响应消息体与通道常量
//!
//! ## 编码约定
//!
//! 所有 payload 均为 JSON。请求消息的各个字段（位姿映射、约束列表、
//! 关节名序、障碍物列表、选项映射）先各自编码为 JSON 字符串，再装进
//! 外层消息体——接收端按需解析，未知字段一律忽略（向前兼容）。

pub mod constraint;
pub mod encoder;
pub mod error;
pub mod obstacle;
pub mod options;
pub mod pose;
pub mod request;
pub mod tspan;

// 重新导出常用类型
pub use constraint::{Constraint, ConstraintBody};
pub use encoder::PlanRequestBuilder;
pub use error::EncodeError;
pub use obstacle::{
    Attachment, AttachmentIndex, Obstacle, ObstacleDescriptor, ObstacleShape, WORLD_FRAME,
    serialize_obstacles,
};
pub use options::{SolverOptions, TIME_SAMPLES_KEY, apply_time_samples};
pub use pose::{NdArray, PoseMap, WorldPose, merge_poses, plan_poses};
pub use request::{
    DEFAULT_IK_TIMEOUT_MS, DEFAULT_TRAJECTORY_TIMEOUT_MS, NO_SOLUTION_INFO, PlanRequest,
    PlanResponse, RequestKind, SolverState, utime_now,
};
pub use tspan::{TSpan, normalize_tspans};
