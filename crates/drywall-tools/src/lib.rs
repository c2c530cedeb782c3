//! # Drywall Tools - 安全门与配置
//!
//! **依赖原则**: 只依赖 `drywall-protocol`，避免依赖 `drywall-driver`
//!
//! ## 包含模块
//!
//! - `safety` - 安全门（纯函数）与安全阈值
//! - `config` - 模拟器参数与 TOML 配置文件

pub mod config;
pub mod safety;

// 重新导出常用类型
pub use config::{RobotConfig, SimulatorConfig};
pub use safety::{SafetyConfig, SafetyGate, SafetyViolation};
