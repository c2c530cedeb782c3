//! 驱动层模块
//!
//! 本模块提供墙板机器人的状态同步与模拟功能，包括：
//! - 状态机（固定转换表）
//! - 内核状态（遥测 + 运动目标，同一把锁保护）
//! - 遥测模拟器（tokio 后台 tick 任务）
//!
//! # 使用场景
//!
//! 大多数用户应该使用 `drywall-client` 提供的 `RobotService`，
//! 它在本模块之上叠加了安全门和参数校验。

mod error;
pub mod machine;
pub mod simulator;
pub mod state;

pub use error::DriverError;
pub use machine::{StateMachine, allowed_targets};
pub use simulator::Simulator;
pub use state::{BATTERY_DEPLETED, BATTERY_FULL, RobotCore, TickEvent};
