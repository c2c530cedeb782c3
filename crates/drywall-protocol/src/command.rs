//! 命令参数定义

use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 升降高度下限（cm）
pub const LIFT_MIN_CM: f64 = 0.0;

/// 升降高度上限（cm）
pub const LIFT_MAX_CM: f64 = 200.0;

/// 升降命令
///
/// 三种命令都按绝对高度设置，`up`/`down` 只是调用方语义上的区分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiftCommand {
    Up,
    Down,
    Set,
}

impl LiftCommand {
    pub const fn as_str(self) -> &'static str {
        match self {
            LiftCommand::Up => "up",
            LiftCommand::Down => "down",
            LiftCommand::Set => "set",
        }
    }
}

impl fmt::Display for LiftCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LiftCommand {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(LiftCommand::Up),
            "down" => Ok(LiftCommand::Down),
            "set" => Ok(LiftCommand::Set),
            other => Err(ProtocolError::UnknownLiftCommand(other.to_string())),
        }
    }
}

/// 转向方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// 根据速度符号推导方向
    ///
    /// 正数为右转，零或负数为左转。
    pub fn from_speed(speed: f64) -> Self {
        if speed > 0.0 {
            TurnDirection::Right
        } else {
            TurnDirection::Left
        }
    }

    /// 航向角速度符号：右转为正，左转为负
    pub const fn sign(self) -> f64 {
        match self {
            TurnDirection::Left => -1.0,
            TurnDirection::Right => 1.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TurnDirection::Left => "left",
            TurnDirection::Right => "right",
        }
    }
}

impl fmt::Display for TurnDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
