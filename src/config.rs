//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and protocol
//! constants live here so they can be tuned in one place.  The USB
//! device configuration itself is an explicit [`UsbdConfig`] value that
//! the binary builds once and hands to the USB initialisation code.

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "usbd-midi-keys";
pub const USB_PRODUCT: &str = "USB MIDI Keys";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// Start the stack on VBUS power events (`true`) or unconditionally at boot.
pub const USBD_POWER_DETECTION: bool = cfg!(feature = "power-detection");

// MIDI class

/// Size of one USB-MIDI event packet in bytes.
pub const USBD_MIDI_EVENT_SIZE: usize = 4;

/// Receive buffer size in bytes (64 queued events).
pub const RX_BUFFER_SIZE: usize = 256;

/// Bulk endpoint max packet size.
pub const MIDI_MAX_PACKET_SIZE: u16 = 64;

/// Embedded IN and OUT jacks on the streaming interface (one cable each way).
pub const MIDI_IN_JACKS: u8 = 1;
pub const MIDI_OUT_JACKS: u8 = 1;

/// Outgoing packets waiting for the bulk IN endpoint.
pub const TX_QUEUE_DEPTH: usize = 16;

/// Board and MIDI events waiting for the dispatcher.
pub const EVENT_QUEUE_DEPTH: usize = 32;

/// USB lifecycle events waiting for the dispatcher.
pub const USB_EVENT_QUEUE_DEPTH: usize = 8;

// MIDI messages

pub const CODE_IDX_NOTE_ON: u8 = 0x09;
pub const CODE_IDX_NOTE_OFF: u8 = 0x08;
pub const NOTE_ON: u8 = 144;
pub const NOTE_OFF: u8 = 128;

pub const NOTE_C: u8 = 48;
pub const NOTE_E: u8 = 52;
pub const NOTE_G: u8 = 55;
pub const NOTE_B: u8 = 59;

/// Velocity used for both note-on and note-off.
pub const VELOCITY: u8 = 100;

/// MIDI channel the keys play on (0-based).
pub const MIDI_CHANNEL: u8 = 0;

// GPIO pin assignments (nRF52840-DK defaults)
//
// Logical names only; the concrete `embassy_nrf::peripherals::*` are
// picked in `main.rs`.
//
//   Button 1..4   → P0.11, P0.12, P0.24, P0.25
//   LED 1..4      → P0.13, P0.14, P0.15, P0.16

/// Button debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 50;

/// DK LEDs light when the pin is driven low.
pub const LED_ACTIVE_LOW: bool = true;

/// MIDI class instance parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiClassConfig {
    pub in_jacks: u8,
    pub out_jacks: u8,
    pub max_packet_size: u16,
    pub rx_buffer_size: usize,
}

impl MidiClassConfig {
    pub const fn new() -> Self {
        Self {
            in_jacks: MIDI_IN_JACKS,
            out_jacks: MIDI_OUT_JACKS,
            max_packet_size: MIDI_MAX_PACKET_SIZE,
            rx_buffer_size: RX_BUFFER_SIZE,
        }
    }
}

impl Default for MidiClassConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// USB device configuration passed to the stack at init.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UsbdConfig {
    /// Wait for VBUS before enabling and starting the stack.
    pub power_detection: bool,
    /// Report start-of-frame events to the dispatcher.
    pub enable_sof: bool,
    pub midi: MidiClassConfig,
}

impl UsbdConfig {
    pub const fn new() -> Self {
        Self {
            power_detection: USBD_POWER_DETECTION,
            enable_sof: false,
            midi: MidiClassConfig::new(),
        }
    }
}

impl Default for UsbdConfig {
    fn default() -> Self {
        Self::new()
    }
}
