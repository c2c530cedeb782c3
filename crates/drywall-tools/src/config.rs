//! # 配置文件
//!
//! TOML 格式，所有字段都有默认值，文件中只需写需要覆盖的项：
//!
//! ```toml
//! [simulator]
//! tick_period_ms = 1000
//! battery_drain_per_tick = 0.1
//!
//! [safety]
//! min_battery = 10.0
//! ```

use crate::safety::SafetyConfig;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 模拟器参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Tick 周期（毫秒）
    pub tick_period_ms: u64,

    /// 每个 tick 的耗电量（%）
    pub battery_drain_per_tick: f64,

    /// 充电状态下每个 tick 的充电量（%）
    pub charge_per_tick: f64,

    /// 升降机构稳定时间（毫秒）
    pub lift_settle_ms: u64,

    /// 启动时电量（%）
    pub initial_battery: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 1000,
            battery_drain_per_tick: 0.1,
            charge_per_tick: 1.0,
            lift_settle_ms: 500,
            initial_battery: 100.0,
        }
    }
}

impl SimulatorConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn lift_settle(&self) -> Duration {
        Duration::from_millis(self.lift_settle_ms)
    }
}

/// 完整配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub simulator: SimulatorConfig,
    pub safety: SafetyConfig,
}

impl RobotConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RobotConfig = toml::from_str(content).context("解析 TOML 配置失败")?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("配置文件无效: {}", path.display()))
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("序列化配置失败")?;
        fs::write(path, content)
            .with_context(|| format!("写入配置文件失败: {}", path.display()))
    }

    /// 校验参数范围
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulator;
        if sim.tick_period_ms == 0 {
            bail!("simulator.tick_period_ms 必须大于 0");
        }
        if !(sim.battery_drain_per_tick.is_finite() && sim.battery_drain_per_tick >= 0.0) {
            bail!(
                "simulator.battery_drain_per_tick 必须为非负数，得到: {}",
                sim.battery_drain_per_tick
            );
        }
        if !(sim.charge_per_tick.is_finite() && sim.charge_per_tick >= 0.0) {
            bail!(
                "simulator.charge_per_tick 必须为非负数，得到: {}",
                sim.charge_per_tick
            );
        }
        if !(0.0..=100.0).contains(&sim.initial_battery) {
            bail!(
                "simulator.initial_battery 超出范围 [0, 100]: {}",
                sim.initial_battery
            );
        }

        let safety = &self.safety;
        if !(0.0..=100.0).contains(&safety.min_battery) {
            bail!(
                "safety.min_battery 超出范围 [0, 100]: {}",
                safety.min_battery
            );
        }
        if !(safety.max_speed.is_finite() && safety.max_speed > 0.0) {
            bail!("safety.max_speed 必须为正数，得到: {}", safety.max_speed);
        }

        Ok(())
    }
}
