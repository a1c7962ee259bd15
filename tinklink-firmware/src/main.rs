//! TinkLink - Scaler Bridge Firmware
//!
//! Main firmware binary for RP2040-based bridge boards. Watches the video
//! switcher for input changes and drives the scaler to the matching
//! profile, waking it first when it is asleep.
//!
//! Everything runs in one cooperative loop: read switcher lines, feed input
//! changes to the controller, let the controller service its scaler link
//! and timers, then yield for a millisecond.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::uart::BufferedUart;
use embassy_time::{Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tinklink_core::config::{BridgeConfig, TransportKind};
use tinklink_core::switcher::InputTracker;
use tinklink_core::traits::SerialLink;
use tinklink_core::ScalerController;
use tinklink_drivers::{AnyLink, TcpSerial, UartSerial, UsbHostSerial, UsbRxState};
use tinklink_hal::{IoUart, UartConfig, Unavailable};
use tinklink_protocol::sanitize_line;

use crate::board::{Uart0Pins, Uart1Pins, UartBank};
use crate::log::DefmtLog;

mod board;
mod config;
mod log;

/// The scaler transports this board can build
type ScalerLink = AnyLink<'static, Unavailable, IoUart<BufferedUart>, Unavailable, DefmtLog>;

// Static cells for UART buffers (must live forever)
static SWITCHER_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static SWITCHER_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static SCALER_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static SCALER_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// No USB host stack on this board; the ring never fills
static USB_RX: UsbRxState = UsbRxState::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("TinkLink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    let mut uarts = UartBank::new(
        p.UART0,
        Uart0Pins {
            gpio0: p.PIN_0,
            gpio1: p.PIN_1,
            gpio12: p.PIN_12,
            gpio13: p.PIN_13,
            gpio16: p.PIN_16,
            gpio17: p.PIN_17,
            gpio28: p.PIN_28,
            gpio29: p.PIN_29,
        },
        p.UART1,
        Uart1Pins {
            gpio4: p.PIN_4,
            gpio5: p.PIN_5,
            gpio8: p.PIN_8,
            gpio9: p.PIN_9,
            gpio20: p.PIN_20,
            gpio21: p.PIN_21,
            gpio24: p.PIN_24,
            gpio25: p.PIN_25,
        },
    );

    let mut switcher = match uarts.open(
        config.switcher.uart,
        &UartConfig::switcher(),
        SWITCHER_TX_BUF.init([0; 64]),
        SWITCHER_RX_BUF.init([0; 256]),
    ) {
        Ok(uart) => {
            info!(
                "Switcher UART on gpio{}/gpio{}",
                config.switcher.uart.tx, config.switcher.uart.rx
            );
            Some(UartSerial::new(IoUart::new(uart), DefmtLog))
        }
        Err(e) => {
            error!("Switcher UART unavailable: {:?}", Debug2Format(&e));
            None
        }
    };

    let link = build_scaler_link(&config, &mut uarts);
    info!("Scaler transport: {}", link.kind());

    let mut controller = ScalerController::new(link, config.scaler.power_policy, DefmtLog);
    controller.set_triggers(config.triggers);
    let mut inputs = InputTracker::new();

    info!("Entering main loop");
    loop {
        // Wraps after ~49 days; the controller compares with wrapping math
        let now = Instant::now().as_millis() as u32;

        if let Some(switcher) = switcher.as_mut() {
            while let Some(raw) = switcher.read_line() {
                let line = sanitize_line(&raw);
                if let Some(input) = inputs.on_line(&line) {
                    info!("Switcher selected input {}", input);
                    controller.on_input_change(input, now);
                }
            }
        }

        controller.update(now);
        Timer::after_millis(1).await;
    }
}

/// Build the one scaler transport named by the configuration
///
/// A transport the board cannot provide still yields a link; it just never
/// connects, so commands are dropped and logged.
fn build_scaler_link(config: &BridgeConfig, uarts: &mut UartBank) -> ScalerLink {
    match config.scaler.transport {
        TransportKind::Usb => {
            warn!("No USB host controller on this board, scaler link stays down");
            AnyLink::Usb(UsbHostSerial::new(Unavailable, &USB_RX, DefmtLog))
        }
        TransportKind::Uart => {
            let pins = config.scaler.uart;
            match uarts.open(
                pins,
                &UartConfig::scaler(),
                SCALER_TX_BUF.init([0; 256]),
                SCALER_RX_BUF.init([0; 256]),
            ) {
                Ok(uart) => {
                    info!("Scaler UART on gpio{}/gpio{}", pins.tx, pins.rx);
                    AnyLink::Uart(UartSerial::new(IoUart::new(uart), DefmtLog))
                }
                Err(e) => {
                    error!("Scaler UART unavailable: {:?}", Debug2Format(&e));
                    AnyLink::Usb(UsbHostSerial::new(Unavailable, &USB_RX, DefmtLog))
                }
            }
        }
        TransportKind::Network => {
            warn!("No network interface on this board, scaler link stays down");
            let network = &config.scaler.network;
            let mut link = TcpSerial::new(Unavailable, DefmtLog);
            if link.configure(&network.host, network.port).is_err() {
                error!("Scaler host name too long");
            }
            AnyLink::Network(link)
        }
    }
}
