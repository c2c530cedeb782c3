//! 命令服务 - 安全门 + 状态机 + 模拟器
//!
//! 每个运动命令都在 [`Simulator::transact`] 的一次加锁内完成：
//!
//! ```text
//! 读取遥测 → 安全门 → 状态机切换 → 写入运动目标
//! ```
//!
//! 任一步骤拒绝都直接返回错误，遥测保持不变。
//! 停止与急停不经过安全门和转换表，任何状态下都成功。

use crate::error::CommandError;
use drywall_driver::{DriverError, RobotCore, Simulator};
use drywall_protocol::{
    LIFT_MAX_CM, LIFT_MIN_CM, LiftCommand, RobotStatus, Telemetry, TurnDirection,
};
use drywall_tools::{RobotConfig, SafetyGate, SafetyViolation};
use tracing::{info, warn};

/// `move_robot` 的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// 命令生效后的状态（零速度释放时为 IDLE 或原状态）
    pub status: RobotStatus,
    /// 限幅后的线速度（m/s）
    pub speed: f64,
    /// 命令生效后的绝对航向（rad）
    pub heading: f64,
}

/// `turn` 的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnOutcome {
    pub status: RobotStatus,
    pub speed: f64,
    /// 显式指定或按速度符号推导的方向
    pub direction: TurnDirection,
    /// 航向角速度（rad/s），右转为正
    pub turn_rate: f64,
}

/// `set_lift` 的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftOutcome {
    pub height: f64,
    pub command: LiftCommand,
}

/// 机器人命令服务
///
/// 进程内只创建一个实例，由调用方显式构造并注入（例如放进 `Arc` 共享给 HTTP 层）。
pub struct RobotService {
    simulator: Simulator,
    gate: SafetyGate,
}

impl RobotService {
    pub fn new(config: RobotConfig) -> Self {
        Self {
            simulator: Simulator::new(config.simulator),
            gate: SafetyGate::new(config.safety),
        }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// 启动模拟器 tick 任务
    pub fn start(&self) -> Result<(), DriverError> {
        self.simulator.start()
    }

    /// 停止模拟器 tick 任务
    pub async fn shutdown(&self) -> Result<(), DriverError> {
        self.simulator.stop().await
    }

    /// 当前遥测
    pub fn get_state(&self) -> Telemetry {
        self.simulator.get_state()
    }

    /// 直线行驶
    ///
    /// # 参数
    /// * `speed` - 线速度（m/s），负数为倒车，幅值限制在 `max_speed` 内
    /// * `heading_offset` - 相对当前航向的偏移（rad），命令生效时一次性叠加
    ///
    /// 速度为 0 时视为释放：MOVING 回到 IDLE，其他非停机状态不变，不经过安全门。
    /// ERROR 和 EMERGENCY_STOP 下仍然拒绝。
    pub fn move_robot(&self, speed: f64, heading_offset: f64) -> Result<MoveOutcome, CommandError> {
        require_finite("speed", speed)?;
        require_finite("heading", heading_offset)?;

        let limits = self.gate.config();
        let speed = if limits.check_speed(speed) {
            speed
        } else {
            let clamped = limits.clamp_speed(speed);
            warn!(
                "Move speed {:.3} m/s exceeds limit, clamped to {:.3} m/s",
                speed, clamped
            );
            clamped
        };

        let result = self.simulator.transact(|core| -> Result<MoveOutcome, CommandError> {
            if speed == 0.0 {
                let status = release(core, RobotStatus::Moving)?;
                return Ok(MoveOutcome {
                    status,
                    speed,
                    heading: core.position().theta,
                });
            }

            self.gate.evaluate(&core.telemetry())?;
            require_transition(core, RobotStatus::Moving)?;
            core.set_speed(speed);
            core.rotate(heading_offset);

            Ok(MoveOutcome {
                status: RobotStatus::Moving,
                speed,
                heading: core.position().theta,
            })
        });

        match &result {
            Ok(outcome) => info!(
                "Move accepted: speed={:.3} m/s, heading={:.3} rad, status={}",
                outcome.speed, outcome.heading, outcome.status
            ),
            Err(e) => warn!("Move rejected: {}", e),
        }
        result
    }

    /// 原地转向
    ///
    /// 未指定方向时按速度符号推导：正数右转，零或负数左转。
    /// 角速度取速度绝对值，右转为正、左转为负。
    /// 速度为 0 时视为释放：TURNING 回到 IDLE，停机状态下同样拒绝。
    pub fn turn(
        &self,
        speed: f64,
        direction: Option<TurnDirection>,
    ) -> Result<TurnOutcome, CommandError> {
        require_finite("speed", speed)?;

        let direction = direction.unwrap_or_else(|| TurnDirection::from_speed(speed));
        let turn_rate = speed.abs() * direction.sign();

        let result = self.simulator.transact(|core| -> Result<TurnOutcome, CommandError> {
            if speed == 0.0 {
                let status = release(core, RobotStatus::Turning)?;
                return Ok(TurnOutcome {
                    status,
                    speed,
                    direction,
                    turn_rate: 0.0,
                });
            }

            self.gate.evaluate(&core.telemetry())?;
            require_transition(core, RobotStatus::Turning)?;
            core.set_turn_rate(turn_rate);

            Ok(TurnOutcome {
                status: RobotStatus::Turning,
                speed,
                direction,
                turn_rate,
            })
        });

        match &result {
            Ok(outcome) => info!(
                "Turn accepted: {} at {:.3} rad/s, status={}",
                outcome.direction, outcome.turn_rate, outcome.status
            ),
            Err(e) => warn!("Turn rejected: {}", e),
        }
        result
    }

    /// 停止：任何状态下都回到 IDLE
    pub fn stop(&self) -> Telemetry {
        let telemetry = self.simulator.transact(|core| {
            core.halt();
            core.telemetry()
        });
        info!("Robot stopped");
        telemetry
    }

    /// 急停：任何状态、任何电量下都成功
    pub fn emergency_stop(&self) -> Telemetry {
        self.simulator.emergency_stop();
        warn!("EMERGENCY STOP engaged");
        self.simulator.get_state()
    }

    /// 设置升降高度
    ///
    /// # 参数
    /// * `height` - 目标高度（cm），必须在 `[0, 200]` 内
    /// * `command` - `up` / `down` / `set`，三者都按绝对高度设置
    ///
    /// 参数校验失败时不触碰遥测。
    pub fn set_lift(&self, height: f64, command: &str) -> Result<LiftOutcome, CommandError> {
        let result = self.try_set_lift(height, command);
        match &result {
            Ok(outcome) => info!(
                "Lift accepted: {} to {:.1} cm",
                outcome.command, outcome.height
            ),
            Err(e) => warn!("Lift rejected: {}", e),
        }
        result
    }

    fn try_set_lift(&self, height: f64, command: &str) -> Result<LiftOutcome, CommandError> {
        let command: LiftCommand = command.parse()?;
        if !height.is_finite() || !(LIFT_MIN_CM..=LIFT_MAX_CM).contains(&height) {
            return Err(CommandError::ValidationFailed(format!(
                "lift height {} cm is outside [{}, {}]",
                height, LIFT_MIN_CM, LIFT_MAX_CM
            )));
        }

        self.simulator
            .set_lift_height(height, command)
            .map_err(|from| CommandError::TransitionRejected {
                from,
                to: RobotStatus::LiftMoving,
            })?;
        Ok(LiftOutcome { height, command })
    }

    /// 开始充电（仅 IDLE 可进入）
    pub fn charge(&self) -> Result<Telemetry, CommandError> {
        let result = self.simulator.transact(|core| -> Result<Telemetry, CommandError> {
            require_transition(core, RobotStatus::Charging)?;
            Ok(core.telemetry())
        });

        match &result {
            Ok(telemetry) => info!("Charging started at {:.1}%", telemetry.battery_level),
            Err(e) => warn!("Charge rejected: {}", e),
        }
        result
    }
}

fn require_finite(field: &str, value: f64) -> Result<(), CommandError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CommandError::ValidationFailed(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}

fn require_transition(core: &mut RobotCore, target: RobotStatus) -> Result<(), CommandError> {
    let from = core.status();
    if core.transition_to(target) {
        Ok(())
    } else {
        Err(CommandError::TransitionRejected { from, to: target })
    }
}

/// 零速度释放：处于 `motion` 状态时回到 IDLE，返回最终状态
///
/// ERROR 按安全门拒绝，EMERGENCY_STOP 按转换表拒绝。
fn release(core: &mut RobotCore, motion: RobotStatus) -> Result<RobotStatus, CommandError> {
    let status = core.status();
    if status.is_halted() {
        return Err(match status {
            RobotStatus::Error => SafetyViolation::Faulted.into(),
            from => CommandError::TransitionRejected { from, to: motion },
        });
    }
    if status == motion {
        core.transition_to(RobotStatus::Idle);
    }
    Ok(core.status())
}
