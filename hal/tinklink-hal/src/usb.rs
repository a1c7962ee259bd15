//! USB host serial abstractions
//!
//! The scaler exposes an FTDI USB-serial bridge on its USB-C port. Boards
//! with a USB host controller implement [`UsbSerialHost`] and deliver
//! hotplug and receive notifications to a [`UsbSerialEvents`] sink from
//! their host-stack callbacks, which may run in interrupt context.

/// USB vendor/product identifier pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbDeviceId {
    pub vid: u16,
    pub pid: u16,
}

/// FTDI FT232R, as fitted to the scaler
pub const FTDI_FT232R: UsbDeviceId = UsbDeviceId {
    vid: 0x0403,
    pid: 0x6001,
};

/// Largest payload a single bulk OUT submission may carry
pub const USB_MAX_PACKET: usize = 64;

/// USB host driver for a single attached USB-serial device
pub trait UsbSerialHost {
    /// Error type for transfer submission
    type Error;

    /// Service host-stack events (enumeration, hotplug, transfer completion)
    ///
    /// Called once per main-loop iteration. Must not block.
    fn poll(&mut self);

    /// Queue a bulk OUT transfer to the attached device
    ///
    /// `data` must not exceed [`UsbSerialHost::max_packet_size`].
    fn submit(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Largest payload accepted by [`UsbSerialHost::submit`]
    fn max_packet_size(&self) -> usize {
        USB_MAX_PACKET
    }

    /// Manufacturer string of the attached device, if known
    fn manufacturer(&self) -> Option<&str> {
        None
    }

    /// Product string of the attached device, if known
    fn product(&self) -> Option<&str> {
        None
    }
}

/// Receiver for host-stack notifications
///
/// Implementations must be callable from interrupt context: every method
/// takes `&self` and must not block or call back into application code.
pub trait UsbSerialEvents {
    /// The device finished enumeration and is ready for transfers
    fn on_attach(&self);

    /// The device was unplugged
    fn on_detach(&self);

    /// Bytes arrived on the bulk IN endpoint
    fn on_receive(&self, data: &[u8]);
}
