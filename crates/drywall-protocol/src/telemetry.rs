//! 遥测快照

use crate::RobotStatus;
use serde::{Deserialize, Serialize};

/// 平面位姿
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X 坐标（m）
    pub x: f64,
    /// Y 坐标（m）
    pub y: f64,
    /// 航向角（rad）
    pub theta: f64,
}

/// 机器人遥测
///
/// 由模拟器独占持有，对外只暴露值拷贝。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub status: RobotStatus,
    pub position: Position,
    /// 电量百分比 `[0, 100]`
    pub battery_level: f64,
    /// 升降高度（cm）
    pub lift_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Telemetry {
    /// 初始遥测：原点、空闲、指定电量
    pub fn at_origin(battery_level: f64) -> Self {
        Self {
            status: RobotStatus::Idle,
            position: Position::default(),
            battery_level,
            lift_height: 0.0,
            error_message: None,
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::at_origin(100.0)
    }
}
