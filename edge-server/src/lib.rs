//! Crab Edge Server - 餐厅 POS 边缘节点
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 订单生命周期、每日流水号、销售账本、同步发件箱
//! - **厨房打印** (`printing`): 按站点分组并发打印厨房单，打印面板池复用
//! - **数据库** (`db`): SQLite (sqlx) 存储与迁移
//! - **HTTP API** (`api`): axum 命令接口
//!
//! # 模块结构
//!
//! ```text
//! edge-server/src/
//! ├── core/          # 配置、状态、HTTP 服务
//! ├── auth/          # 操作员 ID 提取
//! ├── api/           # HTTP 路由和处理器
//! ├── orders/        # 订单存储、流水号、账本
//! ├── printing/      # 站点路由、打印池、分发器
//! ├── db/            # SQLite 连接池和仓储
//! └── utils/         # 日志、时间
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod printing;
pub mod utils;

// Re-export 公共类型
pub use auth::CurrentOperator;
pub use core::{Config, Server, ServerState};
pub use orders::{OrderError, OrderStore, SequenceLedger};
pub use printing::{KitchenPrintService, KitchenTicketDispatcher, PrintSurfacePool, StationMap};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/________ _/ /_
 / /   / ___/ __ `/ __ \
/ /___/ /  / /_/ / /_/ /
\____/_/   \__,_/_.___/
      P O S   E D G E
    "#
    );
}
