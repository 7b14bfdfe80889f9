//! 命名位姿映射与数值数组的线上表示

use crate::constraint::Constraint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 位姿名 → 扁平关节值序列
///
/// 用有序映射保证编码输出稳定（同样的输入产生同样的 JSON）。
pub type PoseMap = BTreeMap<String, Vec<f64>>;

/// `{"__ndarray__": [..]}` 形式的数值数组
///
/// 接收端把数值数组统一解析成这种带标记的对象，位置、四元数、
/// 约束包围盒等都沿用此约定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdArray {
    /// 数组内容
    #[serde(rename = "__ndarray__")]
    pub data: Vec<f64>,
}

impl NdArray {
    /// 所有元素是否有限
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

impl From<&[f64]> for NdArray {
    fn from(data: &[f64]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl From<Vec<f64>> for NdArray {
    fn from(data: Vec<f64>) -> Self {
        Self { data }
    }
}

/// 世界系位姿：位置 + 四元数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldPose {
    /// 位置 (x, y, z)
    pub position: NdArray,
    /// 姿态四元数 (w, x, y, z)
    pub quaternion: NdArray,
}

impl WorldPose {
    /// 创建位姿
    pub fn new(position: [f64; 3], quaternion: [f64; 4]) -> Self {
        Self {
            position: NdArray::from(position.as_slice()),
            quaternion: NdArray::from(quaternion.as_slice()),
        }
    }

    /// 原点、无旋转
    pub fn identity() -> Self {
        Self::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0])
    }

    /// 所有分量是否有限
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.quaternion.is_finite()
    }
}

/// 收集约束贡献的命名位姿
///
/// 姿态约束自带 `(位姿名 → 关节值)` 条目；其余约束不贡献。
pub fn plan_poses(constraints: &[Constraint]) -> PoseMap {
    let mut poses = PoseMap::new();
    for constraint in constraints {
        if let Some((name, values)) = constraint.pose_entry() {
            poses.insert(name.to_string(), values.to_vec());
        }
    }
    poses
}

/// 合并约束位姿与调用方临时位姿
///
/// 同名冲突时调用方条目覆盖约束条目；不冲突的条目与合并顺序无关。
pub fn merge_poses(derived: PoseMap, ad_hoc: &PoseMap) -> PoseMap {
    let mut merged = derived;
    for (name, values) in ad_hoc {
        merged.insert(name.clone(), values.clone());
    }
    merged
}
