//! 客户端接口模块
//!
//! 本模块提供墙板机器人的命令服务，包括：
//! - 安全门 + 状态机 + 模拟器的组合
//! - 行驶、转向、停止、急停、升降、充电
//! - 统一的拒绝原因（安全门 / 状态切换 / 参数校验）
//!
//! # 使用场景
//!
//! HTTP 层持有一个 `Arc<RobotService>`，把每个请求映射到对应的方法；
//! 错误由调用方映射为 4xx 响应。

pub mod error;
pub mod service;

// 重新导出常用类型
pub use error::CommandError;
pub use service::{LiftOutcome, MoveOutcome, RobotService, TurnOutcome};
