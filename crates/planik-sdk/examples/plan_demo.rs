//! 端到端演示：进程内总线 + 脚本化求解器 + 规划客户端
//!
//! 在一个进程里搭出完整的请求链路：客户端编码请求并发布，
//! "求解器"在总线的投递上下文里应答，客户端阻塞等待并取回
//! 结果。真实部署中只需把 `MemoryBus` 换成实际的总线后端。

use bytes::Bytes;
use clap::Parser;
use planik_sdk::bus::{MemoryBus, MessageBus, MessageHandler};
use planik_sdk::client::{ClientConfig, PlannerClientBuilder, PlanningModel, PoseRefs, StaticWorld};
use planik_sdk::protocol::{
    Constraint, ConstraintBody, Obstacle, ObstacleShape, PlanRequest, PlanResponse, PoseMap,
    RequestKind, SolverState, TSpan, WorldPose,
};
use std::sync::{Arc, Weak};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "plan_demo")]
#[command(about = "规划桥接演示 - 进程内总线上的单点与轨迹求解")]
struct Args {
    /// 单点求解等待时长（毫秒）
    #[arg(long, default_value = "12000")]
    ik_timeout_ms: u64,

    /// 轨迹求解等待时长（毫秒）
    #[arg(long, default_value = "20000")]
    trajectory_timeout_ms: u64,
}

/// 六关节演示模型
struct DemoArm;

impl PlanningModel for DemoArm {
    fn joint_names(&self) -> Vec<String> {
        (1..=6).map(|i| format!("j{i}")).collect()
    }
}

/// 演示求解器：IK 回单个状态，轨迹回三个路点
struct DemoSolver {
    bus: Weak<MemoryBus>,
    kind: RequestKind,
}

impl MessageHandler for DemoSolver {
    fn on_message(&self, _channel: &str, payload: &[u8]) {
        let Ok(request) = PlanRequest::from_payload(payload) else {
            return;
        };
        let Some(bus) = self.bus.upgrade() else {
            return;
        };

        let states = match self.kind {
            RequestKind::Ik => vec![SolverState::new(0, vec![0.1, -0.4, 0.8, 0.0, 0.5, 0.2], 1)],
            RequestKind::Trajectory => (0..3i64)
                .map(|i| SolverState::new(i, vec![0.1 * i as f64; 6], 1))
                .collect(),
        };

        let response = PlanResponse::new(request.request_id, states);
        let payload = Bytes::from(response.to_payload().expect("encode response"));
        let _ = bus.publish(self.kind.response_channel(), payload);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    planik_sdk::init_logging();

    println!("🦾 Planik SDK - 规划桥接演示");
    println!("============================\n");

    // ==================== 步骤 1: 搭建总线与求解器 ====================
    println!("📡 步骤 1: 搭建进程内总线与脚本化求解器...");
    let bus = Arc::new(MemoryBus::new());
    for kind in RequestKind::ALL {
        let solver = DemoSolver {
            bus: Arc::downgrade(&bus),
            kind,
        };
        bus.subscribe(kind.request_channel(), Arc::new(solver))?;
    }
    println!("   ✅ 求解器已挂上请求通道\n");

    // ==================== 步骤 2: 构建客户端 ====================
    println!("🔧 步骤 2: 构建规划客户端...");
    let world = StaticWorld::new(vec![Obstacle::new(
        "ball",
        "u1",
        WorldPose::new([0.6, 0.0, 0.4], [1.0, 0.0, 0.0, 0.0]),
        ObstacleShape::Sphere { radius: 0.5 },
    )]);
    let client = PlannerClientBuilder::new()
        .bus(bus.clone())
        .model(Arc::new(DemoArm))
        .obstacles(Arc::new(world))
        .config(ClientConfig {
            ik_timeout_ms: args.ik_timeout_ms,
            trajectory_timeout_ms: args.trajectory_timeout_ms,
        })
        .build()?;
    println!("   ✅ 客户端就绪\n");

    // ==================== 步骤 3: 单点求解 ====================
    println!("🎯 步骤 3: 单点（IK）求解...");
    let constraints = vec![Constraint::new(
        TSpan::new(2.0, 10.0),
        ConstraintBody::position("ee", [0.5, -0.1, 0.3], [0.7, 0.1, 0.5]),
    )];
    let solution = client.solve_for_pose(
        &constraints,
        &PoseMap::new(),
        &PoseRefs::end_only("grasp"),
        None,
    )?;
    println!("   info = {}", solution.info);
    println!("   joints = {:?}\n", solution.joint_position);

    // ==================== 步骤 4: 轨迹求解 ====================
    println!("🛤️  步骤 4: 轨迹求解（时间窗自动归一化）...");
    let trajectory = client.solve_trajectory(
        &constraints,
        &PoseMap::new(),
        &PoseRefs::end_only("grasp"),
        Some(32),
    )?;
    println!("   info = {}", trajectory.info);
    println!("   waypoints = {}", trajectory.len());

    println!("\n✨ 演示结束");
    Ok(())
}
