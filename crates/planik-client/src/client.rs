//! 规划客户端
//!
//! 组合编码器、障碍物序列化与请求桥接，向上提供两个阻塞式
//! 求解操作。临时位姿由调用方按次传入；客户端不累积跨调用
//! 状态，同一个实例可以在线程间共享并发使用。

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{NullStatusReporter, ObstacleSource, PlanningModel, StaticWorld, StatusReporter};
use crate::types::{IkSolution, PlannedTrajectory, PoseRefs};
use planik_bridge::RequestBridge;
use planik_bus::MessageBus;
use planik_protocol::{
    Constraint, NO_SOLUTION_INFO, PlanRequest, PlanRequestBuilder, PoseMap, RequestKind,
    normalize_tspans, serialize_obstacles,
};
use std::sync::Arc;
use tracing::{debug, info};

/// 把响应的关节向量装进全长输出向量
///
/// 响应可能只报告尾部一段关节；把它对齐到输出向量的尾部，
/// 未覆盖的前导项保持 0。响应比模型还长时取其尾部。
fn fit_joint_vector(num_joints: usize, reported: &[f64]) -> Vec<f64> {
    let mut fitted = vec![0.0; num_joints];
    let take = reported.len().min(num_joints);
    fitted[num_joints - take..].copy_from_slice(&reported[reported.len() - take..]);
    fitted
}

/// PlannerClient Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use planik_bus::MemoryBus;
/// use planik_client::{PlannerClientBuilder, PlanningModel};
///
/// struct Arm;
/// impl PlanningModel for Arm {
///     fn joint_names(&self) -> Vec<String> {
///         (1..=6).map(|i| format!("j{i}")).collect()
///     }
/// }
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = PlannerClientBuilder::new()
///     .bus(Arc::new(MemoryBus::new()))
///     .model(Arc::new(Arm))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PlannerClientBuilder {
    bus: Option<Arc<dyn MessageBus>>,
    model: Option<Arc<dyn PlanningModel>>,
    obstacles: Option<Arc<dyn ObstacleSource>>,
    reporter: Option<Arc<dyn StatusReporter>>,
    config: Option<ClientConfig>,
}

impl PlannerClientBuilder {
    /// 创建新的 Builder
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置消息总线（必填）
    pub fn bus(mut self, bus: Arc<dyn MessageBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// 设置规划模型（必填）
    pub fn model(mut self, model: Arc<dyn PlanningModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// 设置障碍物来源（可选，默认空环境）
    pub fn obstacles(mut self, obstacles: Arc<dyn ObstacleSource>) -> Self {
        self.obstacles = Some(obstacles);
        self
    }

    /// 设置状态上报组件（可选，默认丢弃）
    pub fn reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// 设置配置（可选，默认 12s / 20s）
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 构建客户端
    ///
    /// 会在总线上挂好响应分发器。
    ///
    /// # Errors
    ///
    /// - `ClientError::Missing`: 未设置总线或规划模型
    /// - `ClientError::Bridge`: 订阅响应通道失败
    pub fn build(self) -> Result<PlannerClient, ClientError> {
        let bus = self.bus.ok_or(ClientError::Missing("bus"))?;
        let model = self.model.ok_or(ClientError::Missing("model"))?;

        let bridge = RequestBridge::new(bus)?;

        Ok(PlannerClient {
            bridge,
            model,
            obstacles: self
                .obstacles
                .unwrap_or_else(|| Arc::new(StaticWorld::empty())),
            reporter: self.reporter.unwrap_or_else(|| Arc::new(NullStatusReporter)),
            config: self.config.unwrap_or_default(),
        })
    }
}

/// 规划客户端
pub struct PlannerClient {
    bridge: RequestBridge,
    model: Arc<dyn PlanningModel>,
    obstacles: Arc<dyn ObstacleSource>,
    reporter: Arc<dyn StatusReporter>,
    config: ClientConfig,
}

impl std::fmt::Debug for PlannerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PlannerClient {
    /// 当前配置
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 单点（IK）求解
    ///
    /// 编码请求、发布并阻塞等待（等待时长取自配置的
    /// `ik_timeout_ms`）。响应里至少有一个有效状态时，取最后一个
    /// 状态：它的关节值对齐到全长输出向量的尾部，状态码随之；
    /// 一个状态都没有时输出全零向量和"无解"哨兵。状态码一律
    /// 先报给状态组件再返回。
    ///
    /// # 参数
    ///
    /// - `constraints`: 规划约束
    /// - `poses`: 调用方临时位姿（同名覆盖约束贡献的位姿）
    /// - `pose_refs`: 种子/标称/目标位姿名
    /// - `extra_time_samples`: 离散化时间采样覆盖（可选）
    ///
    /// # Errors
    ///
    /// 超时、传输失败和编码失败按各自的错误变体返回，不会被
    /// 吞掉，也不会被当成"无解"。
    pub fn solve_for_pose(
        &self,
        constraints: &[Constraint],
        poses: &PoseMap,
        pose_refs: &PoseRefs,
        extra_time_samples: Option<u32>,
    ) -> Result<IkSolution, ClientError> {
        let joint_names = self.model.joint_names();
        let num_joints = joint_names.len();

        let request = self.encode(constraints, poses, pose_refs, extra_time_samples, joint_names)?;
        let response = self
            .bridge
            .call(RequestKind::Ik, request, self.config.ik_timeout())?;

        let (joint_position, info) = match response.valid_states().last() {
            Some(state) => (
                fit_joint_vector(num_joints, &state.joint_position),
                state.info,
            ),
            None => (vec![0.0; num_joints], NO_SOLUTION_INFO),
        };

        debug!(info, "ik solve finished");
        self.reporter.report(info);

        Ok(IkSolution {
            joint_position,
            info,
        })
    }

    /// 轨迹求解
    ///
    /// 先把约束时间窗归一化到统一参考跨度（半开时间窗原样保
    /// 留），再走与单点求解相同的发布/等待流程（等待时长取自
    /// `trajectory_timeout_ms`）。状态码取首路点；空轨迹用
    /// "无解"哨兵。
    ///
    /// 归一化作用在约束的内部副本上，调用方的约束列表不被改写。
    pub fn solve_trajectory(
        &self,
        constraints: &[Constraint],
        poses: &PoseMap,
        pose_refs: &PoseRefs,
        extra_time_samples: Option<u32>,
    ) -> Result<PlannedTrajectory, ClientError> {
        let mut constraints = constraints.to_vec();
        if let Some(span) = normalize_tspans(&mut constraints) {
            debug!(span_end = span.end, "constraint time spans normalized");
        }

        let joint_names = self.model.joint_names();
        let request =
            self.encode(&constraints, poses, pose_refs, extra_time_samples, joint_names)?;
        let response = self.bridge.call(
            RequestKind::Trajectory,
            request,
            self.config.trajectory_timeout(),
        )?;

        let waypoints = response.valid_states().to_vec();
        let info = waypoints.first().map_or(NO_SOLUTION_INFO, |state| state.info);

        info!(waypoints = waypoints.len(), info, "trajectory solve finished");
        self.reporter.report(info);

        Ok(PlannedTrajectory { waypoints, info })
    }

    /// 编码一条请求（关节名序、选项、障碍物都按当前状态现取）
    fn encode(
        &self,
        constraints: &[Constraint],
        poses: &PoseMap,
        pose_refs: &PoseRefs,
        extra_time_samples: Option<u32>,
        joint_names: Vec<String>,
    ) -> Result<PlanRequest, ClientError> {
        let descriptors = serialize_obstacles(
            &self.obstacles.obstacles(),
            self.obstacles.attachment_index().as_ref(),
        );

        let mut builder = PlanRequestBuilder::new()
            .constraints(constraints)
            .poses(poses)
            .seed_pose(pose_refs.seed.clone())
            .nominal_pose(pose_refs.nominal.clone())
            .end_pose(pose_refs.end.clone())
            .joint_names(joint_names)
            .options(self.model.solver_options())
            .obstacles(descriptors);
        if let Some(samples) = extra_time_samples {
            builder = builder.time_samples(samples);
        }

        Ok(builder.build()?)
    }
}
