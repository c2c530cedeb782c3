//! 状态机 - 固定转换表
//!
//! 所有常规状态切换都经过 [`StateMachine::transition_to`] 校验；
//! 只有停止和急停通过 [`StateMachine::force`] 直接写入。
//!
//! ```text
//! IDLE         → MOVING, TURNING, LIFT_MOVING, CHARGING, ERROR
//! MOVING       → MOVING, TURNING, IDLE, ERROR
//! TURNING      → TURNING, MOVING, IDLE, ERROR
//! LIFT_MOVING  → IDLE, ERROR
//! CHARGING     → IDLE, ERROR
//! ERROR        → IDLE
//! EMERGENCY_STOP → IDLE
//! ```

use drywall_protocol::RobotStatus;
use tracing::trace;

/// 返回 `from` 状态允许切换到的目标集合
pub const fn allowed_targets(from: RobotStatus) -> &'static [RobotStatus] {
    use RobotStatus::*;
    match from {
        Idle => &[Moving, Turning, LiftMoving, Charging, Error],
        // 自环用于运动中更新速度
        Moving => &[Moving, Turning, Idle, Error],
        Turning => &[Turning, Moving, Idle, Error],
        LiftMoving => &[Idle, Error],
        Charging => &[Idle, Error],
        // 手动复位
        Error => &[Idle],
        EmergencyStop => &[Idle],
    }
}

/// 机器人状态机
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: RobotStatus,
}

impl StateMachine {
    /// 创建状态机，初始为 IDLE
    pub fn new() -> Self {
        Self::default()
    }

    /// 从指定状态开始
    pub fn with_status(current: RobotStatus) -> Self {
        Self { current }
    }

    pub fn current(&self) -> RobotStatus {
        self.current
    }

    /// 目标状态是否可从当前状态到达
    pub fn can_transition(&self, target: RobotStatus) -> bool {
        allowed_targets(self.current).contains(&target)
    }

    /// 校验并执行状态切换
    ///
    /// 目标不在转换表中时返回 `false`，当前状态保持不变。
    pub fn transition_to(&mut self, target: RobotStatus) -> bool {
        if !self.can_transition(target) {
            trace!("Transition rejected: {} -> {}", self.current, target);
            return false;
        }
        trace!("Transition: {} -> {}", self.current, target);
        self.current = target;
        true
    }

    /// 绕过转换表直接写入状态
    pub fn force(&mut self, status: RobotStatus) {
        trace!("Forced status: {} -> {}", self.current, status);
        self.current = status;
    }
}
