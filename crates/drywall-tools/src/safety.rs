//! # 安全门
//!
//! 运动命令执行前的安全检查。检查只读遥测，不修改任何状态。

use drywall_protocol::{RobotStatus, Telemetry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 安全配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// 最低电量（%），低于此值拒绝运动命令
    pub min_battery: f64,

    /// 最大线速度（m/s）
    ///
    /// 不参与安全门判定，由命令层用于限幅。
    pub max_speed: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            min_battery: 10.0,
            max_speed: 1.0,
        }
    }
}

impl SafetyConfig {
    /// 检查速度是否在限制内
    pub fn check_speed(&self, speed: f64) -> bool {
        speed.abs() <= self.max_speed
    }

    /// 将速度限幅到 `[-max_speed, max_speed]`，保留符号
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.clamp(-self.max_speed, self.max_speed)
    }
}

/// 安全门拒绝原因
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SafetyViolation {
    #[error("battery level {level:.1}% is below the minimum {min:.1}%")]
    BatteryLow { level: f64, min: f64 },

    #[error("robot is in ERROR state")]
    Faulted,
}

/// 安全门
///
/// 电量低于阈值或处于 ERROR 状态时拒绝运动命令。
#[derive(Debug, Clone, Default)]
pub struct SafetyGate {
    config: SafetyConfig,
}

impl SafetyGate {
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// 检查遥测，返回拒绝原因
    ///
    /// 故障检查优先于电量检查：ERROR 下无论电量多少都报告 `Faulted`。
    pub fn evaluate(&self, telemetry: &Telemetry) -> Result<(), SafetyViolation> {
        if telemetry.status == RobotStatus::Error {
            return Err(SafetyViolation::Faulted);
        }
        if telemetry.battery_level < self.config.min_battery {
            return Err(SafetyViolation::BatteryLow {
                level: telemetry.battery_level,
                min: self.config.min_battery,
            });
        }
        Ok(())
    }

    /// 是否允许运动命令继续
    pub fn check_safety(&self, telemetry: &Telemetry) -> bool {
        self.evaluate(telemetry).is_ok()
    }
}
