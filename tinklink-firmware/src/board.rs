//! RP2040 UART wiring
//!
//! The bridge uses both on-chip UARTs: one for the switcher and, when the
//! scaler transport is `uart`, one for the scaler. Which peripheral serves
//! which link follows from the configured pins.

use embassy_rp::peripherals::{
    PIN_0, PIN_1, PIN_12, PIN_13, PIN_16, PIN_17, PIN_20, PIN_21, PIN_24, PIN_25, PIN_28,
    PIN_29, PIN_4, PIN_5, PIN_8, PIN_9, UART0, UART1,
};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart, Uart};
use embassy_rp::{bind_interrupts, Peri};
use tinklink_core::config::UartPins;
use tinklink_hal::uart::{DataBits, Parity, StopBits};
use tinklink_hal::UartConfig;
use tinklink_hal_rp2040::{PinError, UartAllocator, UartId};

bind_interrupts!(pub struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// GPIOs that can carry UART0
pub struct Uart0Pins {
    pub gpio0: Peri<'static, PIN_0>,
    pub gpio1: Peri<'static, PIN_1>,
    pub gpio12: Peri<'static, PIN_12>,
    pub gpio13: Peri<'static, PIN_13>,
    pub gpio16: Peri<'static, PIN_16>,
    pub gpio17: Peri<'static, PIN_17>,
    pub gpio28: Peri<'static, PIN_28>,
    pub gpio29: Peri<'static, PIN_29>,
}

/// GPIOs that can carry UART1
pub struct Uart1Pins {
    pub gpio4: Peri<'static, PIN_4>,
    pub gpio5: Peri<'static, PIN_5>,
    pub gpio8: Peri<'static, PIN_8>,
    pub gpio9: Peri<'static, PIN_9>,
    pub gpio20: Peri<'static, PIN_20>,
    pub gpio21: Peri<'static, PIN_21>,
    pub gpio24: Peri<'static, PIN_24>,
    pub gpio25: Peri<'static, PIN_25>,
}

/// UART link could not be brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// Pins do not map to a free UART
    Pin(PinError),
    /// TX and RX sit on the same UART but in different pin groups
    UnsupportedPair { tx: u8, rx: u8 },
}

impl From<PinError> for BoardError {
    fn from(e: PinError) -> Self {
        BoardError::Pin(e)
    }
}

/// Both UART peripherals with the pins they can use
pub struct UartBank {
    uart0: Option<(Peri<'static, UART0>, Uart0Pins)>,
    uart1: Option<(Peri<'static, UART1>, Uart1Pins)>,
    allocator: UartAllocator,
}

impl UartBank {
    pub fn new(
        uart0: Peri<'static, UART0>,
        uart0_pins: Uart0Pins,
        uart1: Peri<'static, UART1>,
        uart1_pins: Uart1Pins,
    ) -> Self {
        Self {
            uart0: Some((uart0, uart0_pins)),
            uart1: Some((uart1, uart1_pins)),
            allocator: UartAllocator::new(),
        }
    }

    /// Bring up the UART behind `pins` with interrupt-driven buffers
    pub fn open(
        &mut self,
        pins: UartPins,
        config: &UartConfig,
        tx_buf: &'static mut [u8],
        rx_buf: &'static mut [u8],
    ) -> Result<BufferedUart, BoardError> {
        let id = self.allocator.claim(pins.tx, pins.rx)?;
        let config = embassy_config(config);

        let blocking = match id {
            UartId::Uart0 => {
                let (uart, p) = self.uart0.take().ok_or(PinError::UartInUse(id))?;
                match (pins.tx, pins.rx) {
                    (0, 1) => Uart::new_blocking(uart, p.gpio0, p.gpio1, config),
                    (12, 13) => Uart::new_blocking(uart, p.gpio12, p.gpio13, config),
                    (16, 17) => Uart::new_blocking(uart, p.gpio16, p.gpio17, config),
                    (28, 29) => Uart::new_blocking(uart, p.gpio28, p.gpio29, config),
                    (tx, rx) => return Err(BoardError::UnsupportedPair { tx, rx }),
                }
            }
            UartId::Uart1 => {
                let (uart, p) = self.uart1.take().ok_or(PinError::UartInUse(id))?;
                match (pins.tx, pins.rx) {
                    (4, 5) => Uart::new_blocking(uart, p.gpio4, p.gpio5, config),
                    (8, 9) => Uart::new_blocking(uart, p.gpio8, p.gpio9, config),
                    (20, 21) => Uart::new_blocking(uart, p.gpio20, p.gpio21, config),
                    (24, 25) => Uart::new_blocking(uart, p.gpio24, p.gpio25, config),
                    (tx, rx) => return Err(BoardError::UnsupportedPair { tx, rx }),
                }
            }
        };

        Ok(blocking.into_buffered(Irqs, tx_buf, rx_buf))
    }
}

fn embassy_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}
