//! 请求/响应消息体与通道常量

use crate::error::EncodeError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// 单点求解的默认等待时长（毫秒）
pub const DEFAULT_IK_TIMEOUT_MS: u64 = 12_000;

/// 轨迹求解的默认等待时长（毫秒）
pub const DEFAULT_TRAJECTORY_TIMEOUT_MS: u64 = 20_000;

/// "无解"哨兵状态码
///
/// 响应里一个有效状态都没有时上报此值。与求解器自身的状态码
/// 空间（非负）错开，绝不会被当成一次成功求解。
pub const NO_SOLUTION_INFO: i32 = -1;

/// 请求种类：决定使用的通道对与默认等待时长
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// 单点（IK）求解
    Ik,
    /// 轨迹求解
    Trajectory,
}

impl RequestKind {
    /// 全部请求种类
    pub const ALL: [RequestKind; 2] = [RequestKind::Ik, RequestKind::Trajectory];

    /// 出站请求通道名
    pub fn request_channel(&self) -> &'static str {
        match self {
            RequestKind::Ik => "IK_REQUEST",
            RequestKind::Trajectory => "PLANNER_REQUEST",
        }
    }

    /// 入站响应通道名
    pub fn response_channel(&self) -> &'static str {
        match self {
            RequestKind::Ik => "IK_RESPONSE",
            RequestKind::Trajectory => "PLANNER_RESPONSE",
        }
    }

    /// 默认等待时长
    ///
    /// 只是缺省值——实际等待时长是调用点参数。
    pub fn default_timeout(&self) -> Duration {
        match self {
            RequestKind::Ik => Duration::from_millis(DEFAULT_IK_TIMEOUT_MS),
            RequestKind::Trajectory => Duration::from_millis(DEFAULT_TRAJECTORY_TIMEOUT_MS),
        }
    }
}

/// 当前 utime（微秒，系统时钟）
pub fn utime_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros() as i64
}

/// 规划请求消息体
///
/// 每次调用新建一条，发布后不再修改，调用结束即弃——桥接层
/// 不持久化请求。`poses`/`constraints`/`joint_names`/`obstacles`/
/// `options` 都是编码好的 JSON 字符串，接收端按需解析。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// 请求时间戳（微秒）
    pub utime: i64,
    /// 关联 ID（发布时由桥接层分配，响应按它配对）
    pub request_id: u64,
    /// JSON 编码的位姿映射
    pub poses: String,
    /// JSON 编码的约束列表
    pub constraints: String,
    /// 种子位姿名（空 = 未指定）
    pub seed_pose: String,
    /// 标称位姿名（空 = 未指定）
    pub nominal_pose: String,
    /// 目标位姿名（空 = 未指定）
    pub end_pose: String,
    /// JSON 编码的关节名序（响应关节向量按它索引）
    pub joint_names: String,
    /// JSON 编码的障碍物描述符列表
    pub obstacles: String,
    /// JSON 编码的求解器选项映射
    pub options: String,
}

impl PlanRequest {
    /// 编码为总线 payload
    pub fn to_payload(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// 从总线 payload 解码
    pub fn from_payload(payload: &[u8]) -> Result<Self, EncodeError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// 求解器输出的一个状态（轨迹路点或 IK 解）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverState {
    /// 路点时间戳（微秒）
    pub utime: i64,
    /// 关节位置向量（按请求捕获的关节名序索引，可能只覆盖尾部子集）
    pub joint_position: Vec<f64>,
    /// 求解器状态码（桥接层原样上报，不解释）
    pub info: i32,
}

impl SolverState {
    /// 创建状态
    pub fn new(utime: i64, joint_position: Vec<f64>, info: i32) -> Self {
        Self {
            utime,
            joint_position,
            info,
        }
    }
}

/// 规划响应消息体
///
/// IK 响应通常只有一个状态；轨迹响应是按时间排序的路点序列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    /// 响应时间戳（微秒）
    pub utime: i64,
    /// 关联 ID（回显请求里的值）
    pub request_id: u64,
    /// 有效状态数（可能小于 `states.len()`）
    pub num_states: u32,
    /// 状态序列
    pub states: Vec<SolverState>,
}

impl PlanResponse {
    /// 创建响应，有效状态数 = 全部状态
    pub fn new(request_id: u64, states: Vec<SolverState>) -> Self {
        Self {
            utime: utime_now(),
            request_id,
            num_states: states.len() as u32,
            states,
        }
    }

    /// 有效状态切片（尊重 `num_states` 计数）
    pub fn valid_states(&self) -> &[SolverState] {
        let n = (self.num_states as usize).min(self.states.len());
        &self.states[..n]
    }

    /// 编码为总线 payload
    pub fn to_payload(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// 从总线 payload 解码
    pub fn from_payload(payload: &[u8]) -> Result<Self, EncodeError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_channels() {
        assert_eq!(RequestKind::Ik.request_channel(), "IK_REQUEST");
        assert_eq!(RequestKind::Ik.response_channel(), "IK_RESPONSE");
        assert_eq!(RequestKind::Trajectory.request_channel(), "PLANNER_REQUEST");
        assert_eq!(
            RequestKind::Trajectory.response_channel(),
            "PLANNER_RESPONSE"
        );
    }

    #[test]
    fn test_default_timeouts() {
        assert_eq!(
            RequestKind::Ik.default_timeout(),
            Duration::from_millis(12_000)
        );
        assert_eq!(
            RequestKind::Trajectory.default_timeout(),
            Duration::from_millis(20_000)
        );
    }

    #[test]
    fn test_response_valid_states_respects_count() {
        let states = vec![
            SolverState::new(0, vec![0.1], 0),
            SolverState::new(1, vec![0.2], 0),
            SolverState::new(2, vec![0.3], 0),
        ];
        let mut response = PlanResponse::new(7, states);
        assert_eq!(response.valid_states().len(), 3);

        response.num_states = 2;
        assert_eq!(response.valid_states().len(), 2);

        // 计数超出实际状态数时按实际数截断
        response.num_states = 99;
        assert_eq!(response.valid_states().len(), 3);
    }

    #[test]
    fn test_response_payload_round_trip() {
        let response = PlanResponse::new(42, vec![SolverState::new(5, vec![1.0, 2.0], 1)]);
        let payload = response.to_payload().unwrap();
        let decoded = PlanResponse::from_payload(&payload).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_utime_is_monotonic_enough() {
        let a = utime_now();
        let b = utime_now();
        assert!(b >= a);
    }
}
