//! Transport contract for the scaler link

use tinklink_protocol::LineBuf;

/// A serial-like channel to the scaler
///
/// Implementations are polled from the main loop and must never block.
/// Sends are best-effort: a link that is down, or a payload larger than
/// the link can write atomically, simply yields `false`.
pub trait SerialLink {
    /// Advance I/O once; called every loop iteration
    ///
    /// May do nothing when the peripheral buffers received bytes on its
    /// own (an interrupt-driven UART, for example) and `read_line` drains
    /// them directly.
    fn update(&mut self);

    /// Whether the peer is currently reachable
    fn is_connected(&self) -> bool;

    /// Write a complete payload
    fn send(&mut self, data: &[u8]) -> bool;

    /// Take at most one complete line
    ///
    /// The terminator is stripped and empty lines are never returned.
    /// Partial lines stay buffered until their terminator arrives.
    fn read_line(&mut self) -> Option<LineBuf>;
}

impl<T: SerialLink + ?Sized> SerialLink for &mut T {
    fn update(&mut self) {
        (**self).update()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn send(&mut self, data: &[u8]) -> bool {
        (**self).send(data)
    }

    fn read_line(&mut self) -> Option<LineBuf> {
        (**self).read_line()
    }
}
