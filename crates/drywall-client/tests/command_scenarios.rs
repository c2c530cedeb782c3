//! 命令服务场景测试
//!
//! 使用暂停的 tokio 时钟 + 手动 tick，位置积分和电量变化完全确定。

use drywall_client::{CommandError, RobotService};
use drywall_protocol::{Position, RobotStatus, TurnDirection};
use drywall_tools::{RobotConfig, SafetyViolation, SimulatorConfig};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn service() -> RobotService {
    RobotService::new(RobotConfig::default())
}

fn force_battery(svc: &RobotService, level: f64) {
    svc.simulator().transact(|core| core.set_battery_level(level));
}

#[tokio::test(start_paused = true)]
async fn test_move_tick_stop_scenario() {
    let svc = service();
    let initial = svc.get_state();
    assert_eq!(initial.status, RobotStatus::Idle);
    assert_eq!(initial.battery_level, 100.0);

    let outcome = svc.move_robot(1.0, 1.0).unwrap();
    assert_eq!(outcome.status, RobotStatus::Moving);
    assert_eq!(svc.get_state().status, RobotStatus::Moving);

    // 推进一个 tick
    tokio::time::advance(Duration::from_secs(1)).await;
    svc.simulator().tick();
    let moved = svc.get_state();
    assert_ne!(moved.position, initial.position);
    assert!((moved.position.x - 1.0_f64.cos()).abs() < 1e-9);
    assert!((moved.position.y - 1.0_f64.sin()).abs() < 1e-9);
    assert!(moved.battery_level < initial.battery_level);

    let stopped = svc.stop();
    assert_eq!(stopped.status, RobotStatus::Idle);

    // IDLE 下继续 tick，位置不变
    tokio::time::advance(Duration::from_secs(1)).await;
    svc.simulator().tick();
    let idle = svc.get_state();
    assert_eq!(idle.position, stopped.position);
    assert!(idle.battery_level < stopped.battery_level);
}

#[test]
fn test_low_battery_blocks_move() {
    let svc = service();
    force_battery(&svc, 9.5);

    let err = svc.move_robot(1.0, 0.0).unwrap_err();
    assert_eq!(
        err,
        CommandError::SafetyRejected(SafetyViolation::BatteryLow {
            level: 9.5,
            min: 10.0
        })
    );
    assert_eq!(svc.get_state().status, RobotStatus::Idle);
}

#[test]
fn test_error_state_blocks_move_regardless_of_battery() {
    let svc = service();
    svc.simulator().update_status(RobotStatus::Error);

    let err = svc.move_robot(1.0, 0.0).unwrap_err();
    assert_eq!(err, CommandError::SafetyRejected(SafetyViolation::Faulted));
    assert_eq!(svc.get_state().status, RobotStatus::Error);

    let err = svc.turn(1.0, None).unwrap_err();
    assert!(matches!(err, CommandError::SafetyRejected(_)));
    assert_eq!(svc.get_state().status, RobotStatus::Error);

    // 电量同时过低时仍报告故障
    force_battery(&svc, 5.0);
    let err = svc.move_robot(1.0, 0.0).unwrap_err();
    assert_eq!(err, CommandError::SafetyRejected(SafetyViolation::Faulted));
    assert_eq!(svc.get_state().status, RobotStatus::Error);
}

#[test]
fn test_turn_direction_derivation() {
    let svc = service();

    let outcome = svc.turn(-1.0, None).unwrap();
    assert_eq!(outcome.direction, TurnDirection::Left);
    assert_eq!(outcome.status, RobotStatus::Turning);

    let outcome = svc.turn(1.0, None).unwrap();
    assert_eq!(outcome.direction, TurnDirection::Right);

    // 零速度归为左转，同时释放转向
    let outcome = svc.turn(0.0, None).unwrap();
    assert_eq!(outcome.direction, TurnDirection::Left);
    assert_eq!(outcome.status, RobotStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_turning_changes_heading_only() {
    let svc = service();
    svc.turn(0.5, None).unwrap();

    tokio::time::advance(Duration::from_secs(2)).await;
    let state = svc.get_state();
    assert!((state.position.theta - 1.0).abs() < 1e-9);
    assert_eq!(state.position.x, 0.0);
    assert_eq!(state.position.y, 0.0);
}

#[test]
fn test_emergency_stop_always_succeeds() {
    let svc = service();
    for status in RobotStatus::ALL {
        for battery in [0.0, 5.0, 100.0] {
            svc.simulator().update_status(status);
            force_battery(&svc, battery);

            let telemetry = svc.emergency_stop();
            assert_eq!(telemetry.status, RobotStatus::EmergencyStop);
            assert_eq!(svc.get_state().status, RobotStatus::EmergencyStop);
        }
    }
}

#[test]
fn test_emergency_stop_zeroes_motion() {
    let svc = service();
    svc.move_robot(1.0, 0.0).unwrap();
    svc.emergency_stop();

    let (speed, turn_rate) = svc
        .simulator()
        .transact(|core| (core.speed(), core.turn_rate()));
    assert_eq!(speed, 0.0);
    assert_eq!(turn_rate, 0.0);
}

#[test]
fn test_lift_validation_does_not_mutate() {
    let svc = service();
    let before = svc.get_state();

    for height in [-1.0, 200.01, f64::NAN, f64::INFINITY] {
        let err = svc.set_lift(height, "set").unwrap_err();
        assert!(matches!(err, CommandError::ValidationFailed(_)), "{}", height);
    }
    for command in ["jump", "UP", "", "set "] {
        let err = svc.set_lift(50.0, command).unwrap_err();
        assert!(matches!(err, CommandError::ValidationFailed(_)), "{:?}", command);
    }

    assert_eq!(svc.get_state(), before);
}

#[tokio::test(start_paused = true)]
async fn test_lift_settles_lazily() {
    let svc = service();

    for (height, command) in [(0.0, "down"), (200.0, "up"), (120.5, "set")] {
        let outcome = svc.set_lift(height, command).unwrap();
        assert_eq!(outcome.height, height);
        assert_eq!(svc.get_state().status, RobotStatus::LiftMoving);
        assert_eq!(svc.get_state().lift_height, height);

        tokio::time::advance(Duration::from_millis(499)).await;
        assert_eq!(svc.get_state().status, RobotStatus::LiftMoving);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(svc.get_state().status, RobotStatus::Idle);
    }
}

#[tokio::test(start_paused = true)]
async fn test_lift_busy_until_settled() {
    let svc = service();
    svc.set_lift(100.0, "set").unwrap();

    let err = svc.set_lift(150.0, "set").unwrap_err();
    assert_eq!(
        err,
        CommandError::TransitionRejected {
            from: RobotStatus::LiftMoving,
            to: RobotStatus::LiftMoving
        }
    );
    assert_eq!(svc.get_state().lift_height, 100.0);

    tokio::time::advance(Duration::from_millis(500)).await;
    svc.set_lift(150.0, "set").unwrap();
    assert_eq!(svc.get_state().lift_height, 150.0);
}

#[test]
fn test_rejected_transition_leaves_telemetry_untouched() {
    let svc = service();
    svc.charge().unwrap();
    let before = svc.get_state();

    let err = svc.move_robot(1.0, 0.5).unwrap_err();
    assert_eq!(
        err,
        CommandError::TransitionRejected {
            from: RobotStatus::Charging,
            to: RobotStatus::Moving
        }
    );
    assert_eq!(svc.get_state(), before);
    assert_eq!(svc.get_state().position, Position::default());
}

#[tokio::test(start_paused = true)]
async fn test_battery_depletion_faults_moving_robot() {
    let config = RobotConfig {
        simulator: SimulatorConfig {
            initial_battery: 10.05,
            battery_drain_per_tick: 5.0,
            ..SimulatorConfig::default()
        },
        ..RobotConfig::default()
    };
    let svc = RobotService::new(config);
    svc.move_robot(0.5, 0.0).unwrap();

    svc.simulator().tick();
    svc.simulator().tick();
    svc.simulator().tick();

    let state = svc.get_state();
    assert_eq!(state.battery_level, 0.0);
    assert_eq!(state.status, RobotStatus::Error);
    assert!(state.error_message.is_some());

    // 手动复位后仍因电量不足无法运动
    svc.stop();
    assert!(matches!(
        svc.move_robot(0.5, 0.0),
        Err(CommandError::SafetyRejected(SafetyViolation::BatteryLow { .. }))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_commands_keep_invariants() {
    let config = RobotConfig {
        simulator: SimulatorConfig {
            tick_period_ms: 2,
            battery_drain_per_tick: 0.01,
            lift_settle_ms: 3,
            ..SimulatorConfig::default()
        },
        ..RobotConfig::default()
    };
    let svc = Arc::new(RobotService::new(config));
    svc.start().unwrap();

    let mut tasks = Vec::new();
    for worker in 0..8 {
        let svc = svc.clone();
        tasks.push(tokio::spawn(async move {
            for i in 0..200 {
                match (worker + i) % 6 {
                    0 => drop(svc.move_robot(0.5, 0.1)),
                    1 => drop(svc.turn(-0.5, None)),
                    2 => drop(svc.set_lift((i % 201) as f64, "set")),
                    3 => drop(svc.stop()),
                    4 => drop(svc.charge()),
                    _ => drop(svc.get_state()),
                }
                tokio::task::yield_now().await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let state = svc.get_state();
    assert!((0.0..=100.0).contains(&state.battery_level));
    assert!((0.0..=200.0).contains(&state.lift_height));

    svc.shutdown().await.unwrap();
    assert!(!svc.simulator().is_running());
}

proptest! {
    #[test]
    fn prop_out_of_domain_lift_never_mutates(
        height in prop_oneof![-1000.0f64..-0.001, 200.001f64..1000.0],
        command in "[a-z]{0,6}",
    ) {
        let svc = service();
        let before = svc.get_state();

        prop_assert!(svc.set_lift(height, "set").is_err());
        if !matches!(command.as_str(), "up" | "down" | "set") {
            prop_assert!(svc.set_lift(100.0, &command).is_err());
        }
        prop_assert_eq!(svc.get_state(), before);
    }
}
