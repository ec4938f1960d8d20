//! USB Device subsystem - presents a USB MIDI streaming device to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`, which owns enumeration, descriptors and endpoint
//! buffering.  This module only covers what the application sees of it:
//!
//! - [`UsbEvent`] - bus and power lifecycle notifications
//! - [`UsbStack`] - the enable/start/stop controls the dispatcher calls
//! - [`start_stack`] - boot-time policy (power detection or start now)

pub mod state;

#[cfg(feature = "embedded")]
pub mod device;

use crate::config::UsbdConfig;
use crate::error::Error;

/// Stack lifecycle events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbEvent {
    /// Start of frame.
    Sof,
    /// Host suspended the bus.
    Suspend,
    /// Host resumed the bus.
    Resume,
    /// The device task attached to the bus.
    Started,
    /// The device task detached from the bus.
    Stopped,
    /// VBUS appeared.
    PowerDetected,
    /// VBUS went away.
    PowerRemoved,
    /// USB regulator is up; the stack can be started.
    PowerReady,
}

/// Controls exposed by the USB device stack.
pub trait UsbStack {
    fn is_enabled(&self) -> bool;
    fn enable(&mut self);
    fn disable(&mut self);
    fn start(&mut self);
    fn stop(&mut self);

    /// Let VBUS events drive enable/start instead of starting at boot.
    fn enable_power_events(&mut self) -> Result<(), Error>;
}

/// Bring the stack up according to `config`.
pub fn start_stack<S: UsbStack>(stack: &mut S, config: &UsbdConfig) -> Result<(), Error> {
    if config.power_detection {
        return stack.enable_power_events();
    }

    #[cfg(feature = "defmt")]
    defmt::info!("No USB power detection enabled, starting USB now");

    stack.enable();
    stack.start();
    Ok(())
}
