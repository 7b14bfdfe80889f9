//! Builder 模式的请求编码器
//!
//! 把约束、位姿、关节名序、求解器选项和障碍物描述符组装成一条
//! `PlanRequest`。除了读系统时钟打时间戳之外没有任何副作用；
//! 任一字段编码失败都在发布前返回错误，绝不发出半成品请求。

use crate::constraint::Constraint;
use crate::error::EncodeError;
use crate::obstacle::ObstacleDescriptor;
use crate::options::{SolverOptions, apply_time_samples};
use crate::pose::{PoseMap, merge_poses, plan_poses};
use crate::request::{PlanRequest, utime_now};
use tracing::trace;

/// 规划请求 Builder（链式构造）
///
/// # Example
///
/// ```
/// use planik_protocol::{Constraint, ConstraintBody, PlanRequestBuilder, TSpan};
///
/// let constraints = vec![Constraint::new(
///     TSpan::new(0.0, 1.0),
///     ConstraintBody::position("ee", [-0.1; 3], [0.1; 3]),
/// )];
///
/// let request = PlanRequestBuilder::new()
///     .constraints(&constraints)
///     .joint_names(vec!["j1".to_string(), "j2".to_string()])
///     .end_pose("grasp")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.end_pose, "grasp");
/// ```
#[derive(Default)]
pub struct PlanRequestBuilder {
    constraints: Vec<Constraint>,
    poses: PoseMap,
    seed_pose: String,
    nominal_pose: String,
    end_pose: String,
    joint_names: Option<Vec<String>>,
    options: SolverOptions,
    time_samples: Option<u32>,
    obstacles: Vec<ObstacleDescriptor>,
}

impl PlanRequestBuilder {
    /// 创建新的 Builder
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置约束列表
    pub fn constraints(mut self, constraints: &[Constraint]) -> Self {
        self.constraints = constraints.to_vec();
        self
    }

    /// 设置调用方临时位姿（同名覆盖约束贡献的位姿）
    pub fn poses(mut self, poses: &PoseMap) -> Self {
        self.poses = poses.clone();
        self
    }

    /// 设置种子位姿名（可选）
    pub fn seed_pose(mut self, name: impl Into<String>) -> Self {
        self.seed_pose = name.into();
        self
    }

    /// 设置标称位姿名（可选）
    pub fn nominal_pose(mut self, name: impl Into<String>) -> Self {
        self.nominal_pose = name.into();
        self
    }

    /// 设置目标位姿名（可选）
    pub fn end_pose(mut self, name: impl Into<String>) -> Self {
        self.end_pose = name.into();
        self
    }

    /// 设置关节名序（必填）
    ///
    /// 响应中的关节向量按这份名序索引，必须在编码时捕获，
    /// 不能事后再查——模型的活动关节集可能已经变了。
    pub fn joint_names(mut self, joint_names: Vec<String>) -> Self {
        self.joint_names = Some(joint_names);
        self
    }

    /// 设置求解器选项映射
    pub fn options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// 覆盖离散化时间采样数（可选；替换而非合并对应键）
    pub fn time_samples(mut self, samples: u32) -> Self {
        self.time_samples = Some(samples);
        self
    }

    /// 设置障碍物描述符列表
    pub fn obstacles(mut self, obstacles: Vec<ObstacleDescriptor>) -> Self {
        self.obstacles = obstacles;
        self
    }

    /// 组装请求
    ///
    /// 合并约束位姿与临时位姿（临时条目优先），套用时间采样覆盖，
    /// 逐字段编码为 JSON，打上 utime。关联 ID 留 0，由桥接层在
    /// 发布时分配。
    ///
    /// # Errors
    ///
    /// - [`EncodeError::MissingJointNames`]: 未提供关节名序
    /// - [`EncodeError::NonFinite`] / [`EncodeError::EmptyMeshFilename`]:
    ///   障碍物校验失败
    /// - [`EncodeError::Json`]: 字段编码失败
    pub fn build(self) -> Result<PlanRequest, EncodeError> {
        let joint_names = self.joint_names.ok_or(EncodeError::MissingJointNames)?;

        for descriptor in &self.obstacles {
            descriptor.ensure_encodable()?;
        }

        let poses = merge_poses(plan_poses(&self.constraints), &self.poses);

        let mut options = self.options;
        apply_time_samples(&mut options, self.time_samples);

        trace!(
            constraints = self.constraints.len(),
            poses = poses.len(),
            obstacles = self.obstacles.len(),
            "encoding plan request"
        );

        Ok(PlanRequest {
            utime: utime_now(),
            request_id: 0,
            poses: serde_json::to_string(&poses)?,
            constraints: serde_json::to_string(&self.constraints)?,
            seed_pose: self.seed_pose,
            nominal_pose: self.nominal_pose,
            end_pose: self.end_pose,
            joint_names: serde_json::to_string(&joint_names)?,
            obstacles: serde_json::to_string(&self.obstacles)?,
            options: serde_json::to_string(&options)?,
        })
    }
}
