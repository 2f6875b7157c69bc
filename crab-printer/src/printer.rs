//! Printer adapters for sending ESC/POS data
//!
//! Only raw TCP printing (port 9100) is supported.

use crate::error::{PrintError, PrintResult};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, instrument};

/// Raw printing port used by almost every network thermal printer
pub const DEFAULT_PRINTER_PORT: u16 = 9100;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;
}

/// Network printer (TCP port 9100)
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    timeout: Duration,
}

impl NetworkPrinter {
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        Self::from_addr(&format!("{}:{}", host, port))
    }

    /// Create from a socket address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let addr: SocketAddr = addr
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;

        Ok(Self {
            addr,
            timeout: Duration::from_secs(5),
        })
    }

    /// Create from a configured printer target
    ///
    /// Accepts `ip:port` or a bare `ip`, in which case port 9100 is used.
    pub fn from_target(target: &str) -> PrintResult<Self> {
        let target = target.trim();
        if target.is_empty() {
            return Err(PrintError::InvalidConfig("Empty printer target".into()));
        }
        if target.parse::<SocketAddr>().is_ok() {
            return Self::from_addr(target);
        }
        Self::new(target, DEFAULT_PRINTER_PORT)
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        debug!("Connected, sending {} bytes", data.len());

        tokio::time::timeout(self.timeout, stream.write_all(data))
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.addr)))??;
        stream.flush().await?;

        debug!("Print data sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_from_target_with_port() {
        let printer = NetworkPrinter::from_target("192.168.1.100:9101").unwrap();
        assert_eq!(printer.addr().port(), 9101);
    }

    #[test]
    fn test_from_target_defaults_port() {
        let printer = NetworkPrinter::from_target(" 10.0.0.7 ").unwrap();
        assert_eq!(printer.addr().port(), DEFAULT_PRINTER_PORT);
    }

    #[test]
    fn test_invalid_target() {
        assert!(NetworkPrinter::from_target("").is_err());
        assert!(NetworkPrinter::from_target("not a printer").is_err());
    }

    #[tokio::test]
    async fn test_print_sends_all_bytes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.unwrap();
            received
        });

        let printer = NetworkPrinter::from_target(&addr.to_string()).unwrap();
        printer.print(b"\x1B@KOT\n").await.unwrap();
        drop(printer);

        let received = server.await.unwrap();
        assert_eq!(received, b"\x1B@KOT\n");
    }

    #[tokio::test]
    async fn test_print_to_closed_port_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let printer = NetworkPrinter::from_addr(&addr.to_string())
            .unwrap()
            .with_timeout(Duration::from_millis(300));
        assert!(printer.print(b"x").await.is_err());
    }
}
