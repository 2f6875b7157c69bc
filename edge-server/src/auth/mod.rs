//! 认证模块
//!
//! 会话认证由外部网关完成，本服务只消费网关转发的操作员 ID：
//! - [`CurrentOperator`] - 当前操作员 (来自 `X-Operator-Id`)

pub mod extractor;

pub use extractor::{CurrentOperator, OPERATOR_HEADER};
