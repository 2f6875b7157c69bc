use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::orders::OrderStore;
use crate::printing::{
    KitchenPrintService, KitchenTicketDispatcher, KitchenTicketRenderer, NetworkPrintCapability,
    PrintCapability, PrintSurfacePool,
};
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是廉价 Clone (内部 Arc / 连接池)。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | orders | 订单存储 (流水号、账本、同步发件箱) |
/// | kitchen | 厨房打印服务 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub orders: OrderStore,
    pub kitchen: KitchenPrintService,
}

impl ServerState {
    /// 手动构造，测试中用于注入假打印能力
    pub fn new(config: Config, pool: SqlitePool, capability: Arc<dyn PrintCapability>) -> Self {
        let orders = OrderStore::new(pool.clone(), config.timezone);
        let dispatcher = KitchenTicketDispatcher::new(
            PrintSurfacePool::new(config.print_pool_size, config.paper_width),
            capability,
            KitchenTicketRenderer::new(config.timezone),
            config.default_kitchen_printer.clone(),
            config.print_job_timeout(),
        );
        let kitchen = KitchenPrintService::new(pool.clone(), orders.clone(), dispatcher);

        Self {
            config,
            pool,
            orders,
            kitchen,
        }
    }

    /// 打开数据库并使用网络打印机初始化
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        let capability = Arc::new(NetworkPrintCapability::default());

        tracing::info!(
            database = %config.database_path,
            timezone = %config.timezone,
            print_pool_size = config.print_pool_size,
            default_printer = %config.default_kitchen_printer,
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), db.pool, capability))
    }

    pub fn kitchen_print_service(&self) -> &KitchenPrintService {
        &self.kitchen
    }
}
