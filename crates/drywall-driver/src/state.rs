//! 机器人内核状态
//!
//! [`RobotCore`] 聚合状态机、遥测和运动目标（线速度、角速度、升降截止时间），
//! 由 [`Simulator`](crate::Simulator) 放在同一把锁后面，
//! 保证命令的"检查-执行"序列与 tick 互斥。
//!
//! 遥测中的 `status` 直接读自状态机，两者不会出现分歧。

use crate::machine::StateMachine;
use drywall_protocol::{LIFT_MAX_CM, LIFT_MIN_CM, Position, RobotStatus, Telemetry};
use tokio::time::Instant;

/// 电量满值（%）
pub const BATTERY_FULL: f64 = 100.0;

/// 电量耗尽时写入的故障信息
pub const BATTERY_DEPLETED: &str = "battery depleted";

/// 一次 tick 引起的状态变化
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// 电量耗尽，运动中止并进入 ERROR
    BatteryDepleted,
    /// 充满，回到 IDLE
    ChargeComplete,
}

/// 机器人内核状态
#[derive(Debug, Clone)]
pub struct RobotCore {
    machine: StateMachine,
    position: Position,
    lift_height: f64,
    battery_level: f64,
    error_message: Option<String>,

    /// 线速度（m/s），仅 MOVING 时非零
    speed: f64,
    /// 航向角速度（rad/s），仅 TURNING 时非零
    turn_rate: f64,
    /// 升降稳定截止时间，仅 LIFT_MOVING 时存在
    lift_deadline: Option<Instant>,

    /// 上一次积分的时间点
    last_update: Instant,
}

impl RobotCore {
    pub fn new(initial_battery: f64, now: Instant) -> Self {
        Self {
            machine: StateMachine::new(),
            position: Position::default(),
            lift_height: LIFT_MIN_CM,
            battery_level: initial_battery.clamp(0.0, BATTERY_FULL),
            error_message: None,
            speed: 0.0,
            turn_rate: 0.0,
            lift_deadline: None,
            last_update: now,
        }
    }

    pub fn status(&self) -> RobotStatus {
        self.machine.current()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn battery_level(&self) -> f64 {
        self.battery_level
    }

    pub fn lift_height(&self) -> f64 {
        self.lift_height
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn turn_rate(&self) -> f64 {
        self.turn_rate
    }

    pub fn lift_deadline(&self) -> Option<Instant> {
        self.lift_deadline
    }

    /// 遥测快照
    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            status: self.machine.current(),
            position: self.position,
            battery_level: self.battery_level,
            lift_height: self.lift_height,
            error_message: self.error_message.clone(),
        }
    }

    /// 校验并执行状态切换，成功时清理新状态不再需要的运动目标
    pub fn transition_to(&mut self, target: RobotStatus) -> bool {
        if !self.machine.transition_to(target) {
            return false;
        }
        self.reset_targets_for(target);
        true
    }

    /// 直接写入状态（绕过转换表）
    pub fn update_status(&mut self, status: RobotStatus) {
        self.machine.force(status);
        self.reset_targets_for(status);
    }

    fn reset_targets_for(&mut self, status: RobotStatus) {
        if status != RobotStatus::Moving {
            self.speed = 0.0;
        }
        if status != RobotStatus::Turning {
            self.turn_rate = 0.0;
        }
        if status != RobotStatus::LiftMoving {
            self.lift_deadline = None;
        }
    }

    /// 设置线速度（由命令层在切换到 MOVING 后调用）
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// 设置航向角速度（由命令层在切换到 TURNING 后调用）
    pub fn set_turn_rate(&mut self, turn_rate: f64) {
        self.turn_rate = turn_rate;
    }

    /// 航向偏移
    pub fn rotate(&mut self, offset: f64) {
        self.position.theta += offset;
    }

    /// 开始升降：高度按绝对值设置，进入 LIFT_MOVING，记录稳定截止时间
    ///
    /// 经转换表校验，拒绝时高度不变。高度被限制在 `[0, 200]` 内。
    pub fn begin_lift(&mut self, height: f64, deadline: Instant) -> bool {
        if !self.transition_to(RobotStatus::LiftMoving) {
            return false;
        }
        self.lift_height = height.clamp(LIFT_MIN_CM, LIFT_MAX_CM);
        self.lift_deadline = Some(deadline);
        true
    }

    /// 停止：清零运动目标，回到 IDLE，清除故障信息
    pub fn halt(&mut self) {
        self.update_status(RobotStatus::Idle);
        self.error_message = None;
    }

    /// 急停：清零运动目标，强制进入 EMERGENCY_STOP
    pub fn emergency_stop(&mut self) {
        self.update_status(RobotStatus::EmergencyStop);
    }

    /// 进入 ERROR 并记录原因（经转换表校验）
    pub fn fault(&mut self, message: impl Into<String>) -> bool {
        if !self.transition_to(RobotStatus::Error) {
            return false;
        }
        self.error_message = Some(message.into());
        true
    }

    /// 直接设置电量，限制在 `[0, 100]`
    pub fn set_battery_level(&mut self, level: f64) {
        self.battery_level = level.clamp(0.0, BATTERY_FULL);
    }

    /// 积分到 `now`：按经过的时间推进位置/航向，并结算到期的升降
    pub fn advance(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.last_update = now;

        match self.machine.current() {
            RobotStatus::Moving => {
                let theta = self.position.theta;
                self.position.x += theta.cos() * self.speed * dt;
                self.position.y += theta.sin() * self.speed * dt;
            },
            RobotStatus::Turning => {
                self.position.theta += self.turn_rate * dt;
            },
            RobotStatus::LiftMoving => {
                if self.lift_deadline.is_some_and(|deadline| deadline <= now) {
                    self.transition_to(RobotStatus::Idle);
                }
            },
            _ => {},
        }
    }

    /// 结算一次 tick 的电量变化
    ///
    /// - CHARGING：增加 `charge`，充满后回到 IDLE
    /// - 其他状态：减少 `drain`，下限为 0；运动中耗尽则进入 ERROR
    pub fn apply_tick(&mut self, drain: f64, charge: f64) -> Option<TickEvent> {
        if self.machine.current() == RobotStatus::Charging {
            self.battery_level = (self.battery_level + charge).min(BATTERY_FULL);
            if self.battery_level >= BATTERY_FULL && self.transition_to(RobotStatus::Idle) {
                return Some(TickEvent::ChargeComplete);
            }
            return None;
        }

        if self.battery_level > 0.0 {
            self.battery_level = (self.battery_level - drain).max(0.0);
            if self.battery_level == 0.0
                && self.machine.current().is_in_motion()
                && self.fault(BATTERY_DEPLETED)
            {
                return Some(TickEvent::BatteryDepleted);
            }
        }
        None
    }
}
