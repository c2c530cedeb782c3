//! 驱动层错误类型定义

use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 不在 tokio 运行时内调用 `start()`
    #[error("No tokio runtime available to spawn the tick task")]
    NoRuntime,

    /// Tick 任务已在运行
    #[error("Simulator tick task is already running")]
    AlreadyRunning,

    /// Tick 任务异常退出（panic 或被取消）
    #[error("Tick task error: {0}")]
    TickTask(String),
}

#[cfg(test)]
mod tests {
    use super::DriverError;

    #[test]
    fn test_driver_error_display() {
        assert_eq!(
            format!("{}", DriverError::AlreadyRunning),
            "Simulator tick task is already running"
        );

        let msg = format!("{}", DriverError::NoRuntime);
        assert!(msg.contains("tokio runtime"));

        let msg = format!("{}", DriverError::TickTask("panicked".to_string()));
        assert!(msg.contains("Tick task") && msg.contains("panicked"));
    }
}
