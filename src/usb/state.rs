//! Enabled/started bookkeeping for the USB device task.
//!
//! The device task owns the `embassy-usb` device; the dispatcher only
//! owns this state and forwards the [`StackCommand`]s it yields.

use crate::error::Error;
use crate::usb::UsbEvent;

/// Commands consumed by the USB device task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StackCommand {
    /// Run the device so VBUS changes are reported.
    WatchPower,
    /// Attach to the bus and serve the host.
    Start,
    /// Detach from the bus.
    Stop,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StackState {
    enabled: bool,
    started: bool,
    power_events: bool,
}

impl StackState {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            started: false,
            power_events: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn power_events_enabled(&self) -> bool {
        self.power_events
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable the stack, stopping it first if it is still running.
    pub fn disable(&mut self) -> Option<StackCommand> {
        self.enabled = false;
        self.stop()
    }

    /// Start the stack.  Ignored unless enabled and not yet started.
    pub fn start(&mut self) -> Option<StackCommand> {
        if !self.enabled {
            #[cfg(feature = "defmt")]
            defmt::warn!("USB start ignored: stack not enabled");
            return None;
        }
        if self.started {
            return None;
        }
        self.started = true;
        Some(StackCommand::Start)
    }

    pub fn stop(&mut self) -> Option<StackCommand> {
        if !self.started {
            return None;
        }
        self.started = false;
        Some(StackCommand::Stop)
    }

    /// Hand VBUS supervision to the device task.  Only valid once, before
    /// the stack has been started by hand.
    pub fn enable_power_events(&mut self) -> Result<StackCommand, Error> {
        if self.power_events || self.started {
            return Err(Error::InvalidState);
        }
        self.power_events = true;
        Ok(StackCommand::WatchPower)
    }
}

/// What the device task must do after a [`StackCommand`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunnerStep {
    /// Bring up a parked device.
    pub run: bool,
    /// Report `UsbEvent::Started`.
    pub started: bool,
    /// Cancel the running device and disable it.
    pub stop: bool,
}

/// Device task bookkeeping.
///
/// Under VBUS supervision the device keeps running from the first
/// `WatchPower` on, so `Start` is bookkeeping only and a `Stop` disables
/// the device without parking it.  Only `Stop` ever cancels the device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceRunner {
    watch_power: bool,
    started: bool,
}

impl DeviceRunner {
    pub const fn new() -> Self {
        Self {
            watch_power: false,
            started: false,
        }
    }

    /// Whether the device should be serving the bus.
    pub fn should_run(&self) -> bool {
        self.watch_power || self.started
    }

    pub fn apply(&mut self, command: StackCommand) -> RunnerStep {
        let was_running = self.should_run();
        let mut step = RunnerStep::default();

        match command {
            StackCommand::WatchPower => self.watch_power = true,
            StackCommand::Start => {
                if self.started {
                    return step;
                }
                self.started = true;
                step.started = true;
            }
            StackCommand::Stop => {
                if !self.started {
                    return step;
                }
                self.started = false;
                step.stop = true;
            }
        }

        step.run = !was_running && self.should_run();
        step
    }
}

/// Filters the `embassy-usb` bus enable callbacks into power events.
///
/// A `disable()` on an already unpowered device reports the bus disabled
/// a second time; only the first removal is passed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerTracker {
    powered: bool,
}

impl PowerTracker {
    pub const fn new() -> Self {
        Self { powered: false }
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// Events to post for an `enabled(enabled)` callback.
    pub fn on_enabled(&mut self, enabled: bool) -> &'static [UsbEvent] {
        if enabled == self.powered {
            return &[];
        }
        self.powered = enabled;
        if enabled {
            // The nRF driver only reports the bus enabled once the USB
            // regulator is up, so detection and readiness arrive together.
            &[UsbEvent::PowerDetected, UsbEvent::PowerReady]
        } else {
            &[UsbEvent::PowerRemoved]
        }
    }
}
