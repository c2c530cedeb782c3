//! REST 路由与处理函数
//!
//! 所有处理函数都是同步调用命令服务：命令层只持有一把短锁，不会阻塞运行时。

use crate::error::ApiError;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use drywall_client::RobotService;
use drywall_protocol::{
    AckStatus, LiftRequest, LiftResponse, MessageResponse, MoveRequest, MoveResponse, StatusAck,
    Telemetry, TurnRequest, TurnResponse,
};
use std::sync::Arc;
use tracing::debug;

/// 处理函数共享的服务句柄
pub type SharedService = Arc<RobotService>;

/// 构建完整路由
///
/// 命令路由同时挂载在根路径和 `/commands` 下。
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .merge(command_routes())
        .nest("/commands", command_routes())
        .with_state(service)
}

fn command_routes() -> Router<SharedService> {
    Router::new()
        .route("/status", get(handle_status))
        .route("/move", post(handle_move))
        .route("/turn", post(handle_turn))
        .route("/stop", post(handle_stop))
        .route("/emergency_stop", post(handle_emergency_stop))
        .route("/lift", post(handle_lift))
        .route("/charge", post(handle_charge))
}

async fn handle_root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Drywall Robot API is running".to_string(),
    })
}

async fn handle_status(State(service): State<SharedService>) -> Json<Telemetry> {
    Json(service.get_state())
}

async fn handle_move(
    State(service): State<SharedService>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let (speed, heading) = request.resolve();
    debug!("POST /move speed={} heading={}", speed, heading);

    let outcome = service.move_robot(speed, heading)?;
    Ok(Json(MoveResponse {
        status: outcome.status.into(),
        speed: outcome.speed,
        heading: outcome.heading,
    }))
}

async fn handle_turn(
    State(service): State<SharedService>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    let outcome = service.turn(request.speed, request.direction)?;
    Ok(Json(TurnResponse {
        status: outcome.status.into(),
        speed: outcome.speed,
        direction: outcome.direction,
    }))
}

async fn handle_stop(State(service): State<SharedService>) -> Json<StatusAck> {
    service.stop();
    Json(StatusAck {
        status: AckStatus::Stopped,
    })
}

async fn handle_emergency_stop(State(service): State<SharedService>) -> Json<StatusAck> {
    service.emergency_stop();
    Json(StatusAck {
        status: AckStatus::EmergencyStopped,
    })
}

async fn handle_lift(
    State(service): State<SharedService>,
    Json(request): Json<LiftRequest>,
) -> Result<Json<LiftResponse>, ApiError> {
    let outcome = service.set_lift(request.height_cm, &request.command)?;
    Ok(Json(LiftResponse {
        status: AckStatus::LiftMoved,
        height: outcome.height,
        command: outcome.command,
    }))
}

async fn handle_charge(
    State(service): State<SharedService>,
) -> Result<Json<StatusAck>, ApiError> {
    service.charge()?;
    Ok(Json(StatusAck {
        status: AckStatus::Charging,
    }))
}
