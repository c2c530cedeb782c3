//! 机器人状态定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 机器人状态
///
/// 六态运动模型（IDLE / MOVING / TURNING / LIFT_MOVING / ERROR / EMERGENCY_STOP）
/// 加上充电态 CHARGING。序列化为大写下划线形式（如 `"LIFT_MOVING"`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RobotStatus {
    /// 空闲（初始状态）
    #[default]
    Idle,
    /// 直线行驶
    Moving,
    /// 原地转向
    Turning,
    /// 升降机构运动中（带稳定截止时间）
    LiftMoving,
    /// 充电中
    Charging,
    /// 故障，只能手动复位到 IDLE
    Error,
    /// 急停，只能手动复位到 IDLE
    EmergencyStop,
}

impl RobotStatus {
    /// 全部状态（用于遍历转换表）
    pub const ALL: [RobotStatus; 7] = [
        RobotStatus::Idle,
        RobotStatus::Moving,
        RobotStatus::Turning,
        RobotStatus::LiftMoving,
        RobotStatus::Charging,
        RobotStatus::Error,
        RobotStatus::EmergencyStop,
    ];

    /// 线协议名称
    pub const fn as_str(self) -> &'static str {
        match self {
            RobotStatus::Idle => "IDLE",
            RobotStatus::Moving => "MOVING",
            RobotStatus::Turning => "TURNING",
            RobotStatus::LiftMoving => "LIFT_MOVING",
            RobotStatus::Charging => "CHARGING",
            RobotStatus::Error => "ERROR",
            RobotStatus::EmergencyStop => "EMERGENCY_STOP",
        }
    }

    /// 底盘或升降机构是否在运动
    pub const fn is_in_motion(self) -> bool {
        matches!(
            self,
            RobotStatus::Moving | RobotStatus::Turning | RobotStatus::LiftMoving
        )
    }

    /// 是否处于需要手动复位的停机状态
    pub const fn is_halted(self) -> bool {
        matches!(self, RobotStatus::Error | RobotStatus::EmergencyStop)
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert_eq!(RobotStatus::default(), RobotStatus::Idle);
    }

    #[test]
    fn test_serde_names_match_display() {
        for status in RobotStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_motion_classification() {
        assert!(RobotStatus::Moving.is_in_motion());
        assert!(RobotStatus::LiftMoving.is_in_motion());
        assert!(!RobotStatus::Charging.is_in_motion());
        assert!(RobotStatus::EmergencyStop.is_halted());
        assert!(!RobotStatus::Idle.is_halted());
    }
}
