//! Print capability
//!
//! The dispatcher never talks to a printer directly: it hands the encoded
//! document and the station's printer target to a [`PrintCapability`].

use std::time::Duration;

use async_trait::async_trait;
use crab_printer::{NetworkPrinter, PrintError, Printer};

/// Submit a rendered document to a target printer
#[async_trait]
pub trait PrintCapability: Send + Sync {
    async fn submit(&self, document: &[u8], printer_target: &str) -> Result<(), PrintError>;
}

/// Raw TCP (9100) printing via `crab-printer`
#[derive(Debug, Clone)]
pub struct NetworkPrintCapability {
    connect_timeout: Duration,
}

impl NetworkPrintCapability {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for NetworkPrintCapability {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl PrintCapability for NetworkPrintCapability {
    async fn submit(&self, document: &[u8], printer_target: &str) -> Result<(), PrintError> {
        let printer = NetworkPrinter::from_target(printer_target)?.with_timeout(self.connect_timeout);
        printer.print(document).await
    }
}
