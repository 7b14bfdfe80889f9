//! 调用方可见的结果类型

use planik_protocol::{NO_SOLUTION_INFO, SolverState};

/// 请求引用的三个命名位姿（空字符串 = 未指定）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoseRefs {
    /// 目标位姿名
    pub end: String,
    /// 标称位姿名
    pub nominal: String,
    /// 种子位姿名
    pub seed: String,
}

impl PoseRefs {
    /// 只指定目标位姿
    pub fn end_only(end: impl Into<String>) -> Self {
        Self {
            end: end.into(),
            ..Self::default()
        }
    }
}

/// 单点（IK）求解结果
#[derive(Debug, Clone, PartialEq)]
pub struct IkSolution {
    /// 全长关节向量（按请求捕获的关节名序；未覆盖的前导项为 0）
    pub joint_position: Vec<f64>,
    /// 求解器状态码；无解时为 [`NO_SOLUTION_INFO`]
    pub info: i32,
}

impl IkSolution {
    /// 响应里是否有解（哨兵状态以外都算求解器给出的结果）
    pub fn has_solution(&self) -> bool {
        self.info != NO_SOLUTION_INFO
    }
}

/// 轨迹求解结果
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTrajectory {
    /// 按时间排序的路点序列
    pub waypoints: Vec<SolverState>,
    /// 首路点的状态码；无路点时为 [`NO_SOLUTION_INFO`]
    pub info: i32,
}

impl PlannedTrajectory {
    /// 路点数
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// 是否为空轨迹
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}
