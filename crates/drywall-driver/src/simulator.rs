//! 遥测模拟器 - 后台 tick 任务
//!
//! 模拟器独占持有 [`RobotCore`]，对外提供同步读写接口，
//! 并在 tokio 任务中按固定周期推进遥测。
//!
//! # 并发模型
//!
//! - 请求路径与 tick 任务共享同一把 `parking_lot::Mutex`
//! - 每次访问先把积分推进到当前时刻，再执行读写
//! - [`Simulator::transact`] 让命令层在一次加锁内完成"检查-执行"
//!
//! # 关闭
//!
//! tick 任务同时等待周期定时器和 oneshot 关闭信号，
//! 收到信号立即退出，不会等待下一个周期。

use crate::error::DriverError;
use crate::state::{RobotCore, TickEvent};
use drywall_protocol::{LiftCommand, RobotStatus, Telemetry};
use drywall_tools::SimulatorConfig;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// 运行中的 tick 任务
struct Ticker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// 遥测模拟器
pub struct Simulator {
    core: Arc<Mutex<RobotCore>>,
    config: SimulatorConfig,
    ticker: Mutex<Option<Ticker>>,
}

impl Simulator {
    /// 创建模拟器：原点、IDLE、`initial_battery` 电量
    ///
    /// 创建后不会自动启动 tick，需要调用 [`start`](Self::start)。
    pub fn new(config: SimulatorConfig) -> Self {
        let core = RobotCore::new(config.initial_battery, Instant::now());
        Self {
            core: Arc::new(Mutex::new(core)),
            config,
            ticker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// 启动后台 tick 任务
    ///
    /// # 错误
    ///
    /// - [`DriverError::NoRuntime`]：不在 tokio 运行时内
    /// - [`DriverError::AlreadyRunning`]：已经启动
    pub fn start(&self) -> Result<(), DriverError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| DriverError::NoRuntime)?;

        let mut ticker = self.ticker.lock();
        if ticker.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            return Err(DriverError::AlreadyRunning);
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = runtime.spawn(tick_loop(
            self.core.clone(),
            self.config.clone(),
            shutdown_rx,
        ));
        *ticker = Some(Ticker {
            shutdown: shutdown_tx,
            handle,
        });

        info!(
            "Simulator started (tick period: {} ms)",
            self.config.tick_period_ms
        );
        Ok(())
    }

    /// 停止 tick 任务并等待其退出
    ///
    /// 未启动时直接返回 `Ok(())`。
    pub async fn stop(&self) -> Result<(), DriverError> {
        let ticker = self.ticker.lock().take();
        let Some(ticker) = ticker else {
            return Ok(());
        };

        // 任务可能已经退出，发送失败可以忽略
        let _ = ticker.shutdown.send(());
        ticker
            .handle
            .await
            .map_err(|e| DriverError::TickTask(e.to_string()))?;

        info!("Simulator stopped");
        Ok(())
    }

    /// tick 任务是否在运行
    pub fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// 手动执行一次 tick（与后台任务执行的逻辑相同）
    pub fn tick(&self) {
        let mut core = self.core.lock();
        tick_once(&mut core, &self.config, Instant::now());
    }

    /// 在一次加锁内操作内核状态
    ///
    /// 执行闭包前先把积分推进到当前时刻（包括结算到期的升降）。
    pub fn transact<R>(&self, f: impl FnOnce(&mut RobotCore) -> R) -> R {
        let now = Instant::now();
        let mut core = self.core.lock();
        core.advance(now);
        f(&mut core)
    }

    /// 当前遥测快照
    pub fn get_state(&self) -> Telemetry {
        self.transact(|core| core.telemetry())
    }

    /// 直接设置状态
    pub fn update_status(&self, status: RobotStatus) {
        self.transact(|core| core.update_status(status));
    }

    /// 设置升降高度并进入 LIFT_MOVING
    ///
    /// 只允许从 IDLE 进入，拒绝时返回当时的状态，遥测不变。
    /// 不阻塞：稳定时间到期后，下一次 tick、读取或命令会把状态结算为 IDLE。
    pub fn set_lift_height(&self, height: f64, command: LiftCommand) -> Result<(), RobotStatus> {
        let deadline = Instant::now() + self.config.lift_settle();
        self.transact(|core| {
            let from = core.status();
            if core.begin_lift(height, deadline) {
                debug!("Lift {} to {:.1} cm", command, core.lift_height());
                Ok(())
            } else {
                Err(from)
            }
        })
    }

    /// 急停：清零运动目标，强制进入 EMERGENCY_STOP
    pub fn emergency_stop(&self) {
        self.transact(|core| core.emergency_stop());
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().take() {
            let _ = ticker.shutdown.send(());
        }
    }
}

/// 单次 tick：积分、结算升降、结算电量
fn tick_once(core: &mut RobotCore, config: &SimulatorConfig, now: Instant) {
    core.advance(now);
    match core.apply_tick(config.battery_drain_per_tick, config.charge_per_tick) {
        Some(TickEvent::BatteryDepleted) => {
            warn!("Battery depleted while in motion, robot halted in ERROR state");
        },
        Some(TickEvent::ChargeComplete) => {
            info!("Charging complete, robot back to IDLE");
        },
        None => {},
    }
    trace!(
        "Tick: status={}, battery={:.1}%",
        core.status(),
        core.battery_level()
    );
}

/// Tick 循环
async fn tick_loop(
    core: Arc<Mutex<RobotCore>>,
    config: SimulatorConfig,
    mut shutdown: oneshot::Receiver<()>,
) {
    let period = config.tick_period();
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // 收到信号或发送端被丢弃都退出
            _ = &mut shutdown => {
                debug!("Tick loop received shutdown signal");
                break;
            }
            _ = interval.tick() => {
                let mut core = core.lock();
                tick_once(&mut core, &config, Instant::now());
            }
        }
    }
}
