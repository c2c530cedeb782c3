//! # Drywall Server
//!
//! 石膏板机器人控制服务的 REST 接口层。
//!
//! 二进制入口负责解析参数、加载配置、启动模拟器；
//! 路由本身放在库里，集成测试可以直接挂载。

pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{SharedService, router};
