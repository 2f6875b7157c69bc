//! # crab-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building into a reusable buffer
//! - GBK encoding for thermal printers
//! - Network printing (TCP port 9100)
//!
//! WHAT to print (kitchen tickets, void slips, bills) stays in edge-server.
//!
//! ## Example
//!
//! ```ignore
//! use crab_printer::{EscPosBuilder, NetworkPrinter, Printer};
//!
//! let mut builder = EscPosBuilder::new(48);
//! builder.center().double_size().line("KOT #12").reset_size();
//! builder.sep_double();
//! builder.left().line("2 x Paneer Tikka");
//! builder.feed(3).cut();
//!
//! let mut data = Vec::new();
//! builder.encode_into(&mut data);
//! let printer = NetworkPrinter::from_target("192.168.1.100:9100")?;
//! printer.print(&data).await?;
//! ```

mod encoding;
mod error;
mod escpos;
mod printer;

// Re-exports
pub use encoding::{convert_to_gbk_into, gbk_width, truncate_gbk};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use printer::{DEFAULT_PRINTER_PORT, NetworkPrinter, Printer};
