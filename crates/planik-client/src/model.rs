//! 协作组件接口
//!
//! 客户端自己不持有运动学模型、障碍物库或状态面板——这些都是
//! 外部组件，按接口接入。关节名序、求解器选项和障碍物集合在
//! 每次编码时现查，保证请求反映组件的当前状态。

use planik_protocol::{AttachmentIndex, Obstacle, SolverOptions};

/// 规划模型接口（运动学模型 + 求解器选项来源）
pub trait PlanningModel: Send + Sync {
    /// 当前活动关节名序
    ///
    /// 响应中的关节向量按这份名序索引；编码时捕获一次，
    /// 同一调用内不再重查。
    fn joint_names(&self) -> Vec<String>;

    /// 输出关节向量的长度
    fn num_joints(&self) -> usize {
        self.joint_names().len()
    }

    /// 当前求解器选项映射
    ///
    /// 默认没有选项；选项内容对客户端不透明，原样转发。
    fn solver_options(&self) -> SolverOptions {
        SolverOptions::new()
    }
}

/// 障碍物来源接口（碰撞环境库）
pub trait ObstacleSource: Send + Sync {
    /// 当前障碍物集合（自然枚举顺序）
    fn obstacles(&self) -> Vec<Obstacle>;

    /// 挂接索引：障碍物名 → 被挂接的运动体标识
    ///
    /// 返回 `None` 表示没有挂接跟踪，所有障碍物按固定系处理。
    fn attachment_index(&self) -> Option<AttachmentIndex> {
        None
    }
}

/// 固定障碍物集合（没有挂接跟踪）
///
/// 测试和单进程嵌入用；空集合即"无障碍环境"。
#[derive(Default)]
pub struct StaticWorld {
    /// 障碍物列表
    pub obstacles: Vec<Obstacle>,
}

impl StaticWorld {
    /// 创建空环境
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从障碍物列表创建
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }
}

impl ObstacleSource for StaticWorld {
    fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles.clone()
    }
}

/// 状态上报接口
///
/// 每次求解观察到的状态码（包括"无解"哨兵）都会报给它，
/// 由外部组件决定如何呈现。
pub trait StatusReporter: Send + Sync {
    /// 上报一次求解状态
    fn report(&self, info: i32);
}

/// 丢弃一切上报的空实现
pub struct NullStatusReporter;

impl StatusReporter for NullStatusReporter {
    fn report(&self, _info: i32) {}
}
