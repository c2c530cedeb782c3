//! REST 请求/响应体
//!
//! 字段名与前端约定保持一致（`height_cm`、`battery_level` 等）。

use crate::{LiftCommand, RobotStatus, TurnDirection};
use serde::{Deserialize, Serialize};

/// `POST /move` 请求体
///
/// 两种形式：
/// - `{"speed": 0.5, "heading": 0.3}`：线速度 + 相对航向偏移（`heading` 可省略）
/// - `{"x": 1.0, "y": 1.0}`：机器人坐标系下的方向向量，模长即速度
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveRequest {
    Speed {
        speed: f64,
        #[serde(default)]
        heading: f64,
    },
    Vector {
        x: f64,
        y: f64,
    },
}

impl MoveRequest {
    /// 解析为 `(speed, heading_offset)`
    pub fn resolve(&self) -> (f64, f64) {
        match *self {
            MoveRequest::Speed { speed, heading } => (speed, heading),
            MoveRequest::Vector { x, y } => {
                let speed = x.hypot(y);
                if speed == 0.0 {
                    (0.0, 0.0)
                } else {
                    (speed, y.atan2(x))
                }
            },
        }
    }
}

/// `POST /turn` 请求体
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub speed: f64,
    /// 省略时按速度符号推导
    #[serde(default)]
    pub direction: Option<TurnDirection>,
}

/// `POST /lift` 请求体
///
/// `command` 保持字符串形式，由命令层做域校验并返回 400。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftRequest {
    pub height_cm: f64,
    pub command: String,
}

/// 命令应答状态
///
/// 动作类应答（`stopped`、`lift_moved` 等）加上每个机器人状态各一个名称，
/// 运动命令应答直接报告命令生效后的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Moving,
    Turning,
    Idle,
    Stopped,
    EmergencyStopped,
    LiftMoved,
    LiftMoving,
    Charging,
    Error,
    EmergencyStop,
}

impl From<RobotStatus> for AckStatus {
    fn from(status: RobotStatus) -> Self {
        match status {
            RobotStatus::Idle => AckStatus::Idle,
            RobotStatus::Moving => AckStatus::Moving,
            RobotStatus::Turning => AckStatus::Turning,
            RobotStatus::LiftMoving => AckStatus::LiftMoving,
            RobotStatus::Charging => AckStatus::Charging,
            RobotStatus::Error => AckStatus::Error,
            RobotStatus::EmergencyStop => AckStatus::EmergencyStop,
        }
    }
}

/// `POST /move` 应答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub status: AckStatus,
    pub speed: f64,
    /// 命令生效后的绝对航向（rad）
    pub heading: f64,
}

/// `POST /turn` 应答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub status: AckStatus,
    pub speed: f64,
    pub direction: TurnDirection,
}

/// `POST /lift` 应答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftResponse {
    pub status: AckStatus,
    pub height: f64,
    pub command: LiftCommand,
}

/// 只携带状态的应答（stop / emergency_stop / charge）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusAck {
    pub status: AckStatus,
}

/// `GET /` 应答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// 错误应答
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 错误类别（`safety_rejected` / `transition_rejected` / `validation_failed`）
    pub error: String,
    pub detail: String,
}
