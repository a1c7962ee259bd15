//! UART serial communication abstractions
//!
//! Provides traits for non-blocking serial communication that can be
//! implemented by chip-specific HALs. The bridge polls its links from a
//! single cooperative loop, so reads must never wait for data.

/// Fixed line settings for the scaler link
pub const SCALER_BAUDRATE: u32 = 115_200;

/// Fixed line settings for the switcher link
pub const SWITCHER_BAUDRATE: u32 = 9_600;

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Returns the number of bytes accepted by the peripheral, which may be
    /// fewer than `data.len()` when the transmit buffer is full.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read whatever bytes are already buffered
    ///
    /// Returns `Ok(0)` immediately when nothing is pending.
    fn try_read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Combined UART interface
///
/// For UARTs that provide both TX and RX on a single peripheral.
pub trait Uart: UartTx + UartRx {}

// Blanket implementation
impl<T: UartTx + UartRx> Uart for T {}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// 8-N-1 at the given baud rate
    pub const fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }

    /// Scaler link: 115200 8-N-1
    pub const fn scaler() -> Self {
        Self::with_baudrate(SCALER_BAUDRATE)
    }

    /// Switcher link: 9600 8-N-1
    pub const fn switcher() -> Self {
        Self::with_baudrate(SWITCHER_BAUDRATE)
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::scaler()
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_presets() {
        let scaler = UartConfig::scaler();
        assert_eq!(scaler.baudrate, 115_200);
        assert_eq!(scaler.data_bits, DataBits::Eight);
        assert_eq!(scaler.parity, Parity::None);
        assert_eq!(scaler.stop_bits, StopBits::One);

        let switcher = UartConfig::switcher();
        assert_eq!(switcher.baudrate, 9_600);
        assert_eq!(switcher.parity, Parity::None);

        assert_eq!(UartConfig::default(), scaler);
    }
}
