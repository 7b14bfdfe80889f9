//! 约束有效时间窗（tspan）及其归一化
//!
//! 每条约束带一个 `[start, end]` 有效区间，任一侧可以无界（±∞）。
//! 下游求解器期望同一请求内的有限时间窗落在统一的参考跨度上
//! （数值条件更好），因此轨迹请求在编码前做一次请求级的归一化。

use crate::constraint::Constraint;
use serde::{Deserialize, Serialize};

/// 约束有效时间窗
///
/// 无界侧用 `f64::INFINITY` / `f64::NEG_INFINITY` 表示。
/// 线上编码为两元素数组，非有限的一侧写作 `null`
/// （start 的 `null` 读回 `-inf`，end 的 `null` 读回 `+inf`），
/// JSON 本身保持标准。
///
/// # 示例
///
/// ```
/// use planik_protocol::TSpan;
///
/// let bounded = TSpan::new(2.0, 10.0);
/// assert!(bounded.is_finite());
///
/// let half_open = TSpan::new(f64::NEG_INFINITY, 3.0);
/// assert!(!half_open.is_finite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Option<f64>, Option<f64>)", into = "(Option<f64>, Option<f64>)")]
pub struct TSpan {
    /// 区间起点（可为 -∞）
    pub start: f64,
    /// 区间终点（可为 +∞）
    pub end: f64,
}

impl TSpan {
    /// 全程有效的时间窗
    pub const UNBOUNDED: TSpan = TSpan {
        start: f64::NEG_INFINITY,
        end: f64::INFINITY,
    };

    /// 创建时间窗
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// 两端是否都有限
    ///
    /// 只有两端都有限的时间窗才参与归一化。
    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

impl Default for TSpan {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl From<(Option<f64>, Option<f64>)> for TSpan {
    fn from((start, end): (Option<f64>, Option<f64>)) -> Self {
        Self {
            start: start.unwrap_or(f64::NEG_INFINITY),
            end: end.unwrap_or(f64::INFINITY),
        }
    }
}

impl From<TSpan> for (Option<f64>, Option<f64>) {
    fn from(tspan: TSpan) -> Self {
        let bound = |v: f64| v.is_finite().then_some(v);
        (bound(tspan.start), bound(tspan.end))
    }
}

/// 归一化约束时间窗
///
/// 扫描两端都有限的约束，记录观测到的最小起点与最大终点；
/// 若最大终点非零，则把每个有限时间窗的两端同除以该最大终点。
/// 带无界一侧的约束不参与统计，也不被改写。
///
/// 返回缩放前观测到的有限跨度；没有任何约束两端都有限时返回
/// `None` 且输入不被修改。切片中约束的顺序与条数保持不变。
///
/// # 边界情况
///
/// - 观测到的最大终点恰为 0 时不缩放（避免除零）。
/// - 起点统计对称地取实际观测最小值，不向 0 锚定。
///
/// # 示例
///
/// ```
/// use planik_protocol::{Constraint, ConstraintBody, TSpan, normalize_tspans};
///
/// let mut constraints = vec![
///     Constraint::new(TSpan::new(2.0, 10.0), ConstraintBody::position("ee", [0.0; 3], [0.0; 3])),
///     Constraint::new(TSpan::new(f64::NEG_INFINITY, 3.0), ConstraintBody::position("ee", [0.0; 3], [0.0; 3])),
/// ];
/// let span = normalize_tspans(&mut constraints).unwrap();
/// assert_eq!(span.end, 10.0);
/// assert_eq!(constraints[0].tspan, TSpan::new(0.2, 1.0));
/// // 半开时间窗原样保留
/// assert_eq!(constraints[1].tspan.end, 3.0);
/// ```
pub fn normalize_tspans(constraints: &mut [Constraint]) -> Option<TSpan> {
    let mut observed: Option<TSpan> = None;

    for constraint in constraints.iter() {
        if !constraint.tspan.is_finite() {
            continue;
        }
        let span = observed.get_or_insert(constraint.tspan);
        span.start = span.start.min(constraint.tspan.start);
        span.end = span.end.max(constraint.tspan.end);
    }

    let span = observed?;

    if span.end != 0.0 {
        for constraint in constraints.iter_mut() {
            if constraint.tspan.is_finite() {
                constraint.tspan.start /= span.end;
                constraint.tspan.end /= span.end;
            }
        }
    }

    Some(span)
}
