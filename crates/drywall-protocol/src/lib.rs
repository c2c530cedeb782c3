//! # Drywall Protocol
//!
//! 墙板机器人的状态、遥测与 REST 消息定义（无运行时依赖）
//!
//! ## 模块
//!
//! - `status`: 机器人状态枚举
//! - `telemetry`: 遥测快照（位置、航向、升降高度、电量）
//! - `command`: 命令参数（升降命令、转向方向）
//! - `api`: REST 请求/响应体
//!
//! ## 单位约定
//!
//! - 位置：米（m）
//! - 航向：弧度（rad），不做回绕
//! - 升降高度：厘米（cm），有效范围 `[0, 200]`
//! - 电量：百分比，有效范围 `[0, 100]`

pub mod api;
pub mod command;
pub mod status;
pub mod telemetry;

// 重新导出常用类型
pub use api::*;
pub use command::*;
pub use status::RobotStatus;
pub use telemetry::{Position, Telemetry};

use thiserror::Error;

/// 协议解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unknown lift command: {0:?} (expected one of: up, down, set)")]
    UnknownLiftCommand(String),
}
