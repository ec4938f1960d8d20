//! Board support - four buttons in, four indicator LEDs out.
//!
//! ## Components
//!
//! - **Keys**: buttons 1..4, each reported on press *and* release
//! - **Indicators**: LEDs 1..4 (USB resume, MIDI open, MIDI RX, MIDI TX)
//!
//! The dispatcher only talks to the [`Indicators`] and [`Buttons`] traits,
//! so the same logic drives real GPIO on target and recording mocks in
//! host tests.

pub mod debounce;
pub mod keymap;
pub mod leds;

#[cfg(feature = "embedded")]
pub mod buttons;

use crate::config::{NOTE_B, NOTE_C, NOTE_E, NOTE_G};
use crate::error::Error;

/// Number of keys and of indicator LEDs on the board.
pub const KEY_COUNT: usize = 4;
pub const LED_COUNT: usize = 4;

/// Raw board event code of the last key-press event.  Release events
/// are numbered after it.
pub const EVENT_KEY_LAST: u8 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Key0,
    Key1,
    Key2,
    Key3,
}

impl Key {
    pub const ALL: [Key; KEY_COUNT] = [Key::Key0, Key::Key1, Key::Key2, Key::Key3];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Key::Key0),
            1 => Some(Key::Key1),
            2 => Some(Key::Key2),
            3 => Some(Key::Key3),
            _ => None,
        }
    }

    /// Fixed pitch played by this key (C major seventh chord tones).
    pub const fn note(self) -> u8 {
        match self {
            Key::Key0 => NOTE_C,
            Key::Key1 => NOTE_E,
            Key::Key2 => NOTE_G,
            Key::Key3 => NOTE_B,
        }
    }
}

/// Logical events produced by the button driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    /// Any code with no key action assigned.
    Unassigned(u8),
}

impl BoardEvent {
    /// Decode a raw board event code.
    ///
    /// Codes `0..=3` are key presses, `EVENT_KEY_LAST + 1..=EVENT_KEY_LAST + 4`
    /// the matching releases.
    pub const fn from_code(code: u8) -> Self {
        if (code as usize) < KEY_COUNT {
            if let Some(key) = Key::from_index(code as usize) {
                return BoardEvent::KeyPressed(key);
            }
        }
        if code > EVENT_KEY_LAST {
            if let Some(key) = Key::from_index((code - EVENT_KEY_LAST - 1) as usize) {
                return BoardEvent::KeyReleased(key);
            }
        }
        BoardEvent::Unassigned(code)
    }

    pub const fn code(self) -> u8 {
        match self {
            BoardEvent::KeyPressed(key) => key as u8,
            BoardEvent::KeyReleased(key) => EVENT_KEY_LAST + 1 + key as u8,
            BoardEvent::Unassigned(code) => code,
        }
    }
}

/// Indicator LEDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    UsbResume,
    MidiOpen,
    MidiRx,
    MidiTx,
}

impl Led {
    pub const ALL: [Led; LED_COUNT] = [Led::UsbResume, Led::MidiOpen, Led::MidiRx, Led::MidiTx];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Board indicator outputs.
pub trait Indicators {
    fn led_on(&mut self, led: Led);
    fn led_off(&mut self, led: Led);
    fn led_invert(&mut self, led: Led);

    fn all_off(&mut self) {
        for led in Led::ALL {
            self.led_off(led);
        }
    }
}

/// Button driver control.
pub trait Buttons {
    /// Start delivering key events.
    fn enable(&mut self) -> Result<(), Error>;
}
