//! 端到端集成测试：进程内总线 + 脚本化求解器
//!
//! 验证发布/等待桥接在真实投递上下文下的行为：解析、超时清理、
//! 并发调用互不干扰、空响应的哨兵状态，以及时间窗归一化确实
//! 落到了线上请求里。

use bytes::Bytes;
use crossbeam_channel::{Receiver, Sender, bounded};
use planik_sdk::bus::{MemoryBus, MessageBus, MessageHandler};
use planik_sdk::client::{
    ClientConfig, PlannerClient, PlannerClientBuilder, PlanningModel, PoseRefs, StatusReporter,
};
use planik_sdk::protocol::{
    Constraint, ConstraintBody, NO_SOLUTION_INFO, PlanRequest, PlanResponse, PoseMap, RequestKind,
    SolverState, TSpan,
};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

/// 六关节测试模型
struct SixJointArm;

impl PlanningModel for SixJointArm {
    fn joint_names(&self) -> Vec<String> {
        (1..=6).map(|i| format!("j{i}")).collect()
    }
}

/// 收集上报状态码的测试面板
#[derive(Default)]
struct CollectReporter {
    infos: Mutex<Vec<i32>>,
}

impl StatusReporter for CollectReporter {
    fn report(&self, info: i32) {
        self.infos.lock().unwrap().push(info);
    }
}

/// 脚本化求解器：收到请求就回一条预设响应
///
/// 可选延迟在独立线程里睡，不占总线的投递上下文；可选把收到的
/// 请求转发出去供测试检查。
struct ScriptedSolver {
    bus: Weak<MemoryBus>,
    kind: RequestKind,
    states: Vec<SolverState>,
    delay: Option<Duration>,
    seen: Option<Sender<PlanRequest>>,
}

impl MessageHandler for ScriptedSolver {
    fn on_message(&self, _channel: &str, payload: &[u8]) {
        let request = PlanRequest::from_payload(payload).unwrap();
        if let Some(seen) = &self.seen {
            let _ = seen.try_send(request.clone());
        }

        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let response = PlanResponse::new(request.request_id, self.states.clone());
        let payload = Bytes::from(response.to_payload().unwrap());
        let channel = self.kind.response_channel();

        match self.delay {
            Some(delay) => {
                std::thread::spawn(move || {
                    std::thread::sleep(delay);
                    let _ = bus.publish(channel, payload);
                });
            },
            None => {
                bus.publish(channel, payload).unwrap();
            },
        }
    }
}

fn attach_solver(
    bus: &Arc<MemoryBus>,
    kind: RequestKind,
    states: Vec<SolverState>,
    delay: Option<Duration>,
) -> Receiver<PlanRequest> {
    let (seen_tx, seen_rx) = bounded(8);
    let solver = ScriptedSolver {
        bus: Arc::downgrade(bus),
        kind,
        states,
        delay,
        seen: Some(seen_tx),
    };
    bus.subscribe(kind.request_channel(), Arc::new(solver)).unwrap();
    seen_rx
}

fn client_with(
    bus: &Arc<MemoryBus>,
    reporter: Arc<CollectReporter>,
    config: ClientConfig,
) -> PlannerClient {
    PlannerClientBuilder::new()
        .bus(bus.clone())
        .model(Arc::new(SixJointArm))
        .reporter(reporter)
        .config(config)
        .build()
        .unwrap()
}

fn fast_config() -> ClientConfig {
    ClientConfig {
        ik_timeout_ms: 2_000,
        trajectory_timeout_ms: 2_000,
    }
}

#[test]
fn test_ik_solve_end_to_end() {
    let bus = Arc::new(MemoryBus::new());
    // 求解器只报告尾部两个关节
    attach_solver(
        &bus,
        RequestKind::Ik,
        vec![SolverState::new(0, vec![0.7, 0.9], 3)],
        None,
    );

    let reporter = Arc::new(CollectReporter::default());
    let client = client_with(&bus, reporter.clone(), fast_config());

    let solution = client
        .solve_for_pose(&[], &PoseMap::new(), &PoseRefs::end_only("grasp"), None)
        .unwrap();

    assert_eq!(solution.info, 3);
    assert!(solution.has_solution());
    assert_eq!(solution.joint_position, vec![0.0, 0.0, 0.0, 0.0, 0.7, 0.9]);
    assert_eq!(*reporter.infos.lock().unwrap(), vec![3]);
}

#[test]
fn test_zero_states_yield_no_solution_sentinel() {
    let bus = Arc::new(MemoryBus::new());
    attach_solver(&bus, RequestKind::Ik, vec![], None);

    let reporter = Arc::new(CollectReporter::default());
    let client = client_with(&bus, reporter.clone(), fast_config());

    let solution = client
        .solve_for_pose(&[], &PoseMap::new(), &PoseRefs::default(), None)
        .unwrap();

    assert_eq!(solution.info, NO_SOLUTION_INFO);
    assert!(!solution.has_solution());
    // 全零的默认全长向量
    assert_eq!(solution.joint_position, vec![0.0; 6]);
    assert_eq!(*reporter.infos.lock().unwrap(), vec![NO_SOLUTION_INFO]);
}

#[test]
fn test_timeout_is_distinct_and_leaves_no_listener() {
    let bus = Arc::new(MemoryBus::new());
    // 先不挂求解器
    let reporter = Arc::new(CollectReporter::default());
    let client = client_with(
        &bus,
        reporter.clone(),
        ClientConfig {
            ik_timeout_ms: 100,
            trajectory_timeout_ms: 100,
        },
    );

    let err = client
        .solve_for_pose(&[], &PoseMap::new(), &PoseRefs::default(), None)
        .unwrap_err();
    assert!(err.is_timeout());
    // 超时不是求解结果，不上报状态
    assert!(reporter.infos.lock().unwrap().is_empty());

    // 残留监听会吞掉后续响应；这里第二次调用必须独立成功
    attach_solver(
        &bus,
        RequestKind::Ik,
        vec![SolverState::new(0, vec![0.1; 6], 0)],
        None,
    );
    let solution = client
        .solve_for_pose(&[], &PoseMap::new(), &PoseRefs::default(), None)
        .unwrap();
    assert!(solution.has_solution());
}

#[test]
fn test_concurrent_kinds_resolve_out_of_order() {
    let bus = Arc::new(MemoryBus::new());
    // IK 响应慢，轨迹响应快：后发的调用先解析
    attach_solver(
        &bus,
        RequestKind::Ik,
        vec![SolverState::new(0, vec![0.1; 6], 11)],
        Some(Duration::from_millis(300)),
    );
    attach_solver(
        &bus,
        RequestKind::Trajectory,
        vec![
            SolverState::new(0, vec![0.2; 6], 22),
            SolverState::new(1, vec![0.3; 6], 22),
        ],
        None,
    );

    let reporter = Arc::new(CollectReporter::default());
    let client = Arc::new(client_with(&bus, reporter, fast_config()));

    let ik_client = client.clone();
    let ik_thread = std::thread::spawn(move || {
        ik_client.solve_for_pose(&[], &PoseMap::new(), &PoseRefs::default(), None)
    });
    let traj_client = client.clone();
    let traj_thread = std::thread::spawn(move || {
        traj_client.solve_trajectory(&[], &PoseMap::new(), &PoseRefs::default(), None)
    });

    let trajectory = traj_thread.join().unwrap().unwrap();
    let solution = ik_thread.join().unwrap().unwrap();

    // 各自拿到各自的响应，不因投递顺序串线
    assert_eq!(solution.info, 11);
    assert_eq!(trajectory.info, 22);
    assert_eq!(trajectory.len(), 2);
}

#[test]
fn test_trajectory_normalizes_tspans_on_wire() {
    let bus = Arc::new(MemoryBus::new());
    let seen = attach_solver(
        &bus,
        RequestKind::Trajectory,
        vec![SolverState::new(0, vec![0.0; 6], 0)],
        None,
    );

    let reporter = Arc::new(CollectReporter::default());
    let client = client_with(&bus, reporter, fast_config());

    let constraints = vec![
        Constraint::new(
            TSpan::new(2.0, 10.0),
            ConstraintBody::position("ee", [-0.1; 3], [0.1; 3]),
        ),
        Constraint::new(
            TSpan::new(f64::NEG_INFINITY, 3.0),
            ConstraintBody::orientation("ee", [1.0, 0.0, 0.0, 0.0], 0.05),
        ),
    ];

    client
        .solve_trajectory(&constraints, &PoseMap::new(), &PoseRefs::default(), None)
        .unwrap();

    let request = seen.recv_timeout(Duration::from_secs(2)).unwrap();
    let on_wire: Vec<Constraint> = serde_json::from_str(&request.constraints).unwrap();
    assert_eq!(on_wire[0].tspan, TSpan::new(0.2, 1.0));
    // 半开时间窗原样上线
    assert_eq!(on_wire[1].tspan.end, 3.0);
    assert_eq!(on_wire[1].tspan.start, f64::NEG_INFINITY);

    // 调用方的约束列表不被改写
    assert_eq!(constraints[0].tspan, TSpan::new(2.0, 10.0));
}

#[test]
fn test_ik_requests_are_not_normalized() {
    let bus = Arc::new(MemoryBus::new());
    let seen = attach_solver(
        &bus,
        RequestKind::Ik,
        vec![SolverState::new(0, vec![0.0; 6], 0)],
        None,
    );

    let reporter = Arc::new(CollectReporter::default());
    let client = client_with(&bus, reporter, fast_config());

    let constraints = vec![Constraint::new(
        TSpan::new(2.0, 10.0),
        ConstraintBody::position("ee", [-0.1; 3], [0.1; 3]),
    )];

    client
        .solve_for_pose(&constraints, &PoseMap::new(), &PoseRefs::default(), None)
        .unwrap();

    let request = seen.recv_timeout(Duration::from_secs(2)).unwrap();
    let on_wire: Vec<Constraint> = serde_json::from_str(&request.constraints).unwrap();
    assert_eq!(on_wire[0].tspan, TSpan::new(2.0, 10.0));
}

#[test]
fn test_trajectory_status_comes_from_first_waypoint() {
    let bus = Arc::new(MemoryBus::new());
    attach_solver(
        &bus,
        RequestKind::Trajectory,
        vec![
            SolverState::new(0, vec![0.1; 6], 5),
            SolverState::new(1, vec![0.2; 6], 9),
        ],
        None,
    );

    let reporter = Arc::new(CollectReporter::default());
    let client = client_with(&bus, reporter.clone(), fast_config());

    let trajectory = client
        .solve_trajectory(&[], &PoseMap::new(), &PoseRefs::default(), None)
        .unwrap();

    assert_eq!(trajectory.info, 5);
    assert_eq!(*reporter.infos.lock().unwrap(), vec![5]);
}
