//! Unified error type for usbd-midi-keys.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // USB
    /// USB stack returned an error.
    Usb,

    /// Stack operation not allowed in the current state.
    InvalidState,

    // Board
    /// The button driver could not be enabled.
    Buttons,

    // MIDI
    /// The MIDI port is not open.
    Disconnected,

    /// No received MIDI event is waiting.
    RxEmpty,

    // Generic
    /// A fixed-capacity queue is full.
    BufferOverflow,
}
