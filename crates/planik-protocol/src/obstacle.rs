//! 障碍物描述符及其序列化
//!
//! 碰撞环境里的每个物体都编码成一条统一的描述符记录：公共字段
//! （类名、显示名、uuid、世界位姿、挂接关系）+ 随几何变体而异的
//! 专有字段。全部走结构化 serde 编码，名字和路径里的引号、控制
//! 字符由编码器转义，不会产生畸形 payload。

use crate::error::EncodeError;
use crate::pose::WorldPose;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 固定系哨兵：物体刚性固定在世界系上
pub const WORLD_FRAME: &str = "__world__";

/// 挂接索引：障碍物名 → 其刚性挂接的运动体标识
pub type AttachmentIndex = HashMap<String, String>;

/// 障碍物的挂接关系
///
/// 每条描述符上二者必居其一：要么固定在世界系（哨兵），要么挂接
/// 在某个运动体上。枚举保证不会同时出现或同时缺失。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Attachment {
    /// 固定在世界系（线上写作 `"__world__"`）
    World,
    /// 刚性挂接在指定运动体上
    Body(String),
}

impl From<String> for Attachment {
    fn from(value: String) -> Self {
        if value == WORLD_FRAME {
            Self::World
        } else {
            Self::Body(value)
        }
    }
}

impl From<Attachment> for String {
    fn from(attachment: Attachment) -> Self {
        match attachment {
            Attachment::World => WORLD_FRAME.to_string(),
            Attachment::Body(id) => id,
        }
    }
}

/// 几何变体及其专有字段
///
/// `classname` 标签在线上区分变体。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "classname")]
pub enum ObstacleShape {
    /// 三角网格，引用文件系统路径
    #[serde(rename = "MeshAffordanceItem")]
    Mesh { filename: String },

    /// 球体
    #[serde(rename = "SphereAffordanceItem")]
    Sphere { radius: f64 },

    /// 圆柱体
    #[serde(rename = "CylinderAffordanceItem")]
    Cylinder { radius: f64, length: f64 },

    /// 胶囊体
    #[serde(rename = "CapsuleAffordanceItem")]
    Capsule { radius: f64, length: f64 },

    /// 长方体
    #[serde(rename = "BoxAffordanceItem")]
    Box { dimensions: [f64; 3] },

    /// 胶囊环
    #[serde(rename = "CapsuleRingAffordanceItem")]
    CapsuleRing {
        radius: f64,
        tube_radius: f64,
        segments: u32,
    },
}

impl ObstacleShape {
    /// 数值字段是否全部有限
    fn is_finite(&self) -> bool {
        match self {
            Self::Mesh { .. } => true,
            Self::Sphere { radius } => radius.is_finite(),
            Self::Cylinder { radius, length } | Self::Capsule { radius, length } => {
                radius.is_finite() && length.is_finite()
            },
            Self::Box { dimensions } => dimensions.iter().all(|d| d.is_finite()),
            Self::CapsuleRing {
                radius,
                tube_radius,
                ..
            } => radius.is_finite() && tube_radius.is_finite(),
        }
    }
}

/// 环境中的一个障碍物（尚未解析挂接关系）
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// 显示名（挂接索引按它查询）
    pub name: String,
    /// 稳定唯一标识
    pub uuid: String,
    /// 世界系位姿
    pub pose: WorldPose,
    /// 几何变体
    pub shape: ObstacleShape,
}

impl Obstacle {
    /// 创建障碍物
    pub fn new(
        name: impl Into<String>,
        uuid: impl Into<String>,
        pose: WorldPose,
        shape: ObstacleShape,
    ) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
            pose,
            shape,
        }
    }
}

/// 障碍物描述符：线上记录
///
/// ```json
/// {"name":"ball","uuid":"u1","pose":{...},"attachedTo":"__world__",
///  "classname":"SphereAffordanceItem","radius":0.5}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDescriptor {
    /// 显示名
    pub name: String,
    /// 稳定唯一标识
    pub uuid: String,
    /// 世界系位姿
    pub pose: WorldPose,
    /// 挂接关系（固定系哨兵或运动体标识）
    #[serde(rename = "attachedTo")]
    pub attached_to: Attachment,
    /// 几何变体专有字段（与公共字段平铺在同一对象里）
    #[serde(flatten)]
    pub shape: ObstacleShape,
}

impl ObstacleDescriptor {
    /// 发布前校验：数值字段有限、mesh 路径非空
    ///
    /// 编码失败必须发生在请求上总线之前。
    pub fn ensure_encodable(&self) -> Result<(), EncodeError> {
        if !self.pose.is_finite() {
            return Err(EncodeError::NonFinite {
                field: format!("obstacle '{}' pose", self.name),
            });
        }
        if !self.shape.is_finite() {
            return Err(EncodeError::NonFinite {
                field: format!("obstacle '{}' geometry", self.name),
            });
        }
        if let ObstacleShape::Mesh { filename } = &self.shape
            && filename.is_empty()
        {
            return Err(EncodeError::EmptyMeshFilename {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// 把障碍物集合序列化为描述符列表
///
/// 迭代顺序 = 输入集合的自然顺序。挂接解析规则：
/// - 索引里能按名字查到 → 记录被挂接的运动体标识；
/// - 查不到，或根本没有索引 → 固定系哨兵。
pub fn serialize_obstacles(
    obstacles: &[Obstacle],
    attachments: Option<&AttachmentIndex>,
) -> Vec<ObstacleDescriptor> {
    obstacles
        .iter()
        .map(|obstacle| {
            let attached_to = attachments
                .and_then(|index| index.get(&obstacle.name))
                .map(|body| Attachment::Body(body.clone()))
                .unwrap_or(Attachment::World);

            ObstacleDescriptor {
                name: obstacle.name.clone(),
                uuid: obstacle.uuid.clone(),
                pose: obstacle.pose.clone(),
                attached_to,
                shape: obstacle.shape.clone(),
            }
        })
        .collect()
}
