//! 命令层错误类型定义

use drywall_protocol::{ProtocolError, RobotStatus};
use drywall_tools::SafetyViolation;
use thiserror::Error;

/// 命令被拒绝的原因
///
/// 三类错误都可由调用方重试，不会留下部分修改的遥测。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// 安全门拒绝（电量过低或处于 ERROR）
    #[error("Safety check failed: {0}")]
    SafetyRejected(#[from] SafetyViolation),

    /// 目标状态不可从当前状态到达
    #[error("Transition rejected: {from} -> {to}")]
    TransitionRejected { from: RobotStatus, to: RobotStatus },

    /// 参数超出定义域
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl CommandError {
    /// 错误类别名（用于 REST 错误体）
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::SafetyRejected(_) => "safety_rejected",
            CommandError::TransitionRejected { .. } => "transition_rejected",
            CommandError::ValidationFailed(_) => "validation_failed",
        }
    }
}

impl From<ProtocolError> for CommandError {
    fn from(err: ProtocolError) -> Self {
        CommandError::ValidationFailed(err.to_string())
    }
}
