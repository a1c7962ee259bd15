//! UART peripheral allocation
//!
//! RP2040 has two UART peripherals (UART0 and UART1), each reachable
//! from several GPIO pairs. This module maps pins to peripherals and
//! tracks their usage.

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

/// Function of a UART-capable pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinRole {
    Tx,
    Rx,
}

/// Pin configuration the RP2040 cannot realize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// GPIO has no UART TX/RX function
    NotUartPin(u8),
    /// GPIO is a UART pin, but not for the requested direction
    WrongRole(u8),
    /// TX and RX belong to different peripherals
    PeripheralMismatch,
    /// The peripheral is already used by another link
    UartInUse(UartId),
}

/// UART allocation state
pub struct UartAllocator {
    uart0_allocated: bool,
    uart1_allocated: bool,
}

impl Default for UartAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl UartAllocator {
    /// Create a new UART allocator
    pub fn new() -> Self {
        Self {
            uart0_allocated: false,
            uart1_allocated: false,
        }
    }

    /// Allocate a UART peripheral
    pub fn allocate(&mut self, id: UartId) -> Result<(), PinError> {
        let slot = match id {
            UartId::Uart0 => &mut self.uart0_allocated,
            UartId::Uart1 => &mut self.uart1_allocated,
        };
        if *slot {
            return Err(PinError::UartInUse(id));
        }
        *slot = true;
        Ok(())
    }

    /// Validate a pin pair and claim its peripheral
    pub fn claim(&mut self, tx: u8, rx: u8) -> Result<UartId, PinError> {
        let id = validate_pins(tx, rx)?;
        self.allocate(id)?;
        Ok(id)
    }

    /// Release a UART peripheral
    pub fn release(&mut self, id: UartId) {
        match id {
            UartId::Uart0 => self.uart0_allocated = false,
            UartId::Uart1 => self.uart1_allocated = false,
        }
    }

    /// Check if a UART is allocated
    pub fn is_allocated(&self, id: UartId) -> bool {
        match id {
            UartId::Uart0 => self.uart0_allocated,
            UartId::Uart1 => self.uart1_allocated,
        }
    }
}

/// Determine which UART can use a given GPIO pin
pub fn gpio_to_uart(gpio: u8) -> Option<(UartId, PinRole)> {
    // UART0: GPIO 0/1, 12/13, 16/17, 28/29
    // UART1: GPIO 4/5, 8/9, 20/21, 24/25
    let id = match gpio {
        0 | 1 | 12 | 13 | 16 | 17 | 28 | 29 => UartId::Uart0,
        4 | 5 | 8 | 9 | 20 | 21 | 24 | 25 => UartId::Uart1,
        _ => return None,
    };
    // TX on the even pin of each pair
    let role = if gpio % 2 == 0 { PinRole::Tx } else { PinRole::Rx };
    Some((id, role))
}

/// Check that `tx`/`rx` form a usable pair and return its peripheral
pub fn validate_pins(tx: u8, rx: u8) -> Result<UartId, PinError> {
    let (tx_uart, tx_role) = gpio_to_uart(tx).ok_or(PinError::NotUartPin(tx))?;
    let (rx_uart, rx_role) = gpio_to_uart(rx).ok_or(PinError::NotUartPin(rx))?;

    if tx_role != PinRole::Tx {
        return Err(PinError::WrongRole(tx));
    }
    if rx_role != PinRole::Rx {
        return Err(PinError::WrongRole(rx));
    }
    if tx_uart != rx_uart {
        return Err(PinError::PeripheralMismatch);
    }
    Ok(tx_uart)
}
