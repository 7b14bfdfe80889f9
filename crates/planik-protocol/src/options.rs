//! 求解器选项映射

use serde_json::Value;
use std::collections::BTreeMap;

/// 求解器选项：键 → 任意 JSON 值
///
/// 选项内容对桥接层不透明，原样转发给求解器。
pub type SolverOptions = BTreeMap<String, Value>;

/// 离散化时间采样数的选项键
pub const TIME_SAMPLES_KEY: &str = "timeSamples";

/// 应用时间采样覆盖
///
/// 给出覆盖值时直接替换 `timeSamples` 键（替换而非合并）；
/// 未给出时选项映射原样保留。
pub fn apply_time_samples(options: &mut SolverOptions, extra_time_samples: Option<u32>) {
    if let Some(samples) = extra_time_samples {
        options.insert(TIME_SAMPLES_KEY.to_string(), Value::from(samples));
    }
}
