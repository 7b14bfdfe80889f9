//! 协议层错误类型定义

use thiserror::Error;

/// 编码错误类型
///
/// 请求在发布前组装失败时返回。编码失败必须发生在任何消息
/// 上总线之前——绝不发送半成品请求。
#[derive(Error, Debug)]
pub enum EncodeError {
    /// JSON 编解码失败
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// 缺少关节名序
    ///
    /// 响应中的关节向量按编码时捕获的关节名序索引，
    /// 没有它请求无法被解释。
    #[error("joint name ordering is required but was not provided")]
    MissingJointNames,

    /// 数值字段包含非有限值（NaN / ±inf）
    ///
    /// 时间窗以外的数值字段（半径、尺寸、位姿分量）必须有限，
    /// 否则 JSON 侧会退化为 null，接收端无从恢复。
    #[error("non-finite value in {field}")]
    NonFinite { field: String },

    /// Mesh 障碍物缺少文件路径
    #[error("obstacle '{name}' has an empty mesh filename")]
    EmptyMeshFilename { name: String },
}
