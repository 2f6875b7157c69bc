//! Order lifecycle
//!
//! - **store**: [`OrderStore`], create / complete / cancel / soft-delete / item status
//! - **ledger**: [`SequenceLedger`], per-day order numbers and the daily sales ledger
//! - **money**: Decimal based totals and ledger deltas
//! - **validation**: input checks run before any write
//!
//! # Data Flow
//!
//! ```text
//! createOrder ─▶ validate ─▶ [tx: next number ─▶ order + items ─▶ outbox] ─▶ commit
//! completeOrder ─▶ [tx: status guard ─▶ update ─▶ ledger credit ─▶ outbox] ─▶ commit
//! ```

pub mod error;
pub mod ledger;
pub mod money;
pub mod store;
pub mod validation;

pub use error::{OrderError, OrderResult};
pub use ledger::SequenceLedger;
pub use store::{ENTITY_ORDER, ENTITY_ORDER_ITEM, OrderStore};
