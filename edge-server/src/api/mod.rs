//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单生命周期
//! - [`kitchen`] - 厨房单 / 补打 / 退菜单
//! - [`ledger`] - 每日销售账本
//! - [`print_stations`] - 厨房站点与分类映射

pub mod health;
pub mod kitchen;
pub mod ledger;
pub mod orders;
pub mod print_stations;

pub use crate::utils::AppResult;
