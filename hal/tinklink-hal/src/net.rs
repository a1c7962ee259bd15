//! TCP client abstractions
//!
//! Network-attached scalers are reached over a plain TCP session
//! (telnet-style, no option negotiation).

/// Default port for the scaler's network console
pub const DEFAULT_PORT: u16 = 23;

/// Upper bound for a single connection attempt
pub const CONNECT_TIMEOUT_MS: u32 = 2000;

/// Maximum length of a configured host name or address
pub const MAX_HOST_LEN: usize = 64;

/// Single-session TCP client
pub trait TcpClient {
    /// Error type for socket operations
    type Error;

    /// Open a session to `host:port`, giving up after `timeout_ms`
    fn connect(&mut self, host: &str, port: u16, timeout_ms: u32) -> Result<(), Self::Error>;

    /// Check if the session is still established
    fn is_connected(&self) -> bool;

    /// Write data to the session
    ///
    /// Returns the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read whatever bytes are already buffered
    ///
    /// Returns `Ok(0)` immediately when nothing is pending.
    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Close the session (no-op if not connected)
    fn close(&mut self);
}
