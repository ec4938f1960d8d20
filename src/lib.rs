//! usbd-midi-keys library.
//!
//! Everything the firmware decides lives here as plain `no_std` logic
//! that builds and tests on the host: MIDI packets, the key map, the RX
//! queue, the USB stack state machines, the LED driver, button debouncing,
//! the event queue and the three event handlers.  The hardware adapters
//! (USB device task, MIDI class tasks, button tasks, the static queue) are
//! compiled only with the `embedded` feature and are used by `main.rs`.
//!
//! Usage: `cargo test --lib` (host) or
//! `cargo build --release --features embedded --target thumbv7em-none-eabihf`.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event_queue;
pub mod midi;
pub mod usb;

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════
