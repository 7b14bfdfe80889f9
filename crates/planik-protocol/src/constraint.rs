//! 规划约束的变体注册表与编码
//!
//! 约束在线上是带 `class` 标签的 JSON 记录：标签区分变体，变体各自
//! 携带参数字段。注册表是封闭的（一个变体一个枚举成员），但解码端
//! 忽略未知字段，新字段可以随时加进线上格式而不破坏旧接收方。

use crate::pose::NdArray;
use crate::tspan::TSpan;
use serde::{Deserialize, Serialize};

/// 一条规划约束
///
/// 由有效时间窗和变体本体组成。本体字段在线上与 `tspan` 平铺在
/// 同一个 JSON 对象里：
///
/// ```text
/// {"tspan":[0.0,1.0],"class":"PositionConstraint","link_name":"ee",...}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// 约束有效时间窗
    pub tspan: TSpan,
    /// 变体本体（`class` 标签 + 参数）
    #[serde(flatten)]
    pub body: ConstraintBody,
}

impl Constraint {
    /// 创建约束
    pub fn new(tspan: TSpan, body: ConstraintBody) -> Self {
        Self { tspan, body }
    }

    /// 该约束贡献的命名位姿（若有）
    ///
    /// 姿态约束自带 `(位姿名 → 关节值)`，会被并入请求的位姿映射。
    pub fn pose_entry(&self) -> Option<(&str, &[f64])> {
        match &self.body {
            ConstraintBody::Posture {
                pose_name,
                joint_positions,
                ..
            } if !pose_name.is_empty() => Some((pose_name.as_str(), joint_positions.as_slice())),
            _ => None,
        }
    }
}

/// 约束变体本体
///
/// `class` 标签在线上保留变体身份，参数随变体而异。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum ConstraintBody {
    /// 末端/连杆位置约束：连杆上的参考点须落在轴对齐的包围盒内
    #[serde(rename = "PositionConstraint")]
    Position {
        /// 被约束的连杆名
        link_name: String,
        /// 约束表达所在的参考坐标系（空 = 世界系）
        #[serde(default)]
        reference_frame: String,
        /// 包围盒下界 (x, y, z)
        lower_bound: NdArray,
        /// 包围盒上界 (x, y, z)
        upper_bound: NdArray,
    },

    /// 连杆姿态约束：姿态须落在目标四元数的圆锥容差内
    #[serde(rename = "QuatConstraint")]
    Orientation {
        /// 被约束的连杆名
        link_name: String,
        /// 目标姿态四元数 (w, x, y, z)
        quaternion: NdArray,
        /// 圆锥容差（弧度）
        #[serde(default)]
        cone_tolerance: f64,
    },

    /// 姿态约束：命名位姿给出一组关节的目标值
    #[serde(rename = "PostureConstraint")]
    Posture {
        /// 位姿名（并入请求位姿映射的键）
        pose_name: String,
        /// 受约束的关节名
        joint_names: Vec<String>,
        /// 对应的关节值（与 `joint_names` 等长）
        joint_positions: Vec<f64>,
    },
}

impl ConstraintBody {
    /// 创建位置约束（世界系）
    pub fn position(link_name: impl Into<String>, lower: [f64; 3], upper: [f64; 3]) -> Self {
        Self::Position {
            link_name: link_name.into(),
            reference_frame: String::new(),
            lower_bound: NdArray::from(lower.as_slice()),
            upper_bound: NdArray::from(upper.as_slice()),
        }
    }

    /// 创建姿态（四元数）约束
    pub fn orientation(
        link_name: impl Into<String>,
        quaternion: [f64; 4],
        cone_tolerance: f64,
    ) -> Self {
        Self::Orientation {
            link_name: link_name.into(),
            quaternion: NdArray::from(quaternion.as_slice()),
            cone_tolerance,
        }
    }

    /// 创建命名姿态约束
    pub fn posture(
        pose_name: impl Into<String>,
        joint_names: Vec<String>,
        joint_positions: Vec<f64>,
    ) -> Self {
        Self::Posture {
            pose_name: pose_name.into(),
            joint_names,
            joint_positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_wire_format_keeps_class_tag() {
        let constraint = Constraint::new(
            TSpan::new(0.0, 1.0),
            ConstraintBody::position("ee_link", [-0.1, -0.1, 0.2], [0.1, 0.1, 0.4]),
        );

        let json = serde_json::to_value(&constraint).unwrap();
        assert_eq!(json["class"], "PositionConstraint");
        assert_eq!(json["link_name"], "ee_link");
        assert_eq!(json["tspan"][0], 0.0);
        assert_eq!(json["lower_bound"]["__ndarray__"][2], 0.2);
    }

    #[test]
    fn test_constraint_round_trip_preserves_variant() {
        let constraints = vec![
            Constraint::new(
                TSpan::UNBOUNDED,
                ConstraintBody::orientation("wrist", [1.0, 0.0, 0.0, 0.0], 0.05),
            ),
            Constraint::new(
                TSpan::new(0.5, 1.0),
                ConstraintBody::posture(
                    "grasp",
                    vec!["j1".to_string(), "j2".to_string()],
                    vec![0.3, -0.7],
                ),
            ),
        ];

        let json = serde_json::to_string(&constraints).unwrap();
        let decoded: Vec<Constraint> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, constraints);
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        // 新版本编码器多写的字段不应让旧解码端报错
        let json = r#"{
            "tspan": [null, 2.0],
            "class": "QuatConstraint",
            "link_name": "head",
            "quaternion": {"__ndarray__": [1.0, 0.0, 0.0, 0.0]},
            "cone_tolerance": 0.1,
            "experimental_weight": 0.25
        }"#;

        let constraint: Constraint = serde_json::from_str(json).unwrap();
        assert_eq!(constraint.tspan.start, f64::NEG_INFINITY);
        assert!(matches!(
            constraint.body,
            ConstraintBody::Orientation { .. }
        ));
    }

    #[test]
    fn test_pose_entry_only_for_named_postures() {
        let posture = Constraint::new(
            TSpan::UNBOUNDED,
            ConstraintBody::posture("stand", vec!["j1".to_string()], vec![0.0]),
        );
        let (name, values) = posture.pose_entry().unwrap();
        assert_eq!(name, "stand");
        assert_eq!(values, &[0.0]);

        let position = Constraint::new(
            TSpan::UNBOUNDED,
            ConstraintBody::position("ee", [0.0; 3], [0.0; 3]),
        );
        assert!(position.pose_entry().is_none());

        // 空位姿名不贡献条目
        let unnamed = Constraint::new(
            TSpan::UNBOUNDED,
            ConstraintBody::posture("", vec![], vec![]),
        );
        assert!(unnamed.pose_entry().is_none());
    }
}
