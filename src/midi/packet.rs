//! USB-MIDI 1.0 event packet.
//!
//! Layout (4 bytes):
//! ```text
//! Byte 0: Cable number (high nibble) | Code index number (low nibble)
//! Byte 1: MIDI status byte (e.g. 0x90 = note-on, channel 0)
//! Byte 2: MIDI data byte 1 (note number)
//! Byte 3: MIDI data byte 2 (velocity)
//! ```

use crate::config::{CODE_IDX_NOTE_OFF, CODE_IDX_NOTE_ON, NOTE_OFF, NOTE_ON, USBD_MIDI_EVENT_SIZE};

/// Code index number - the low nibble of the packet header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodeIndex {
    MiscFunction,
    CableEvent,
    SystemCommon2,
    SystemCommon3,
    SysExStart,
    SysExEnd1,
    SysExEnd2,
    SysExEnd3,
    NoteOff,
    NoteOn,
    PolyKeyPress,
    ControlChange,
    ProgramChange,
    ChannelPressure,
    PitchBend,
    SingleByte,
}

impl CodeIndex {
    /// Decode the low nibble of a header byte.
    pub const fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0F {
            0x0 => Self::MiscFunction,
            0x1 => Self::CableEvent,
            0x2 => Self::SystemCommon2,
            0x3 => Self::SystemCommon3,
            0x4 => Self::SysExStart,
            0x5 => Self::SysExEnd1,
            0x6 => Self::SysExEnd2,
            0x7 => Self::SysExEnd3,
            0x8 => Self::NoteOff,
            0x9 => Self::NoteOn,
            0xA => Self::PolyKeyPress,
            0xB => Self::ControlChange,
            0xC => Self::ProgramChange,
            0xD => Self::ChannelPressure,
            0xE => Self::PitchBend,
            _ => Self::SingleByte,
        }
    }

    /// Number of MIDI bytes carried by a packet with this code index.
    ///
    /// Misc-function and cable-event packets are reserved; they report 3.
    pub const fn midi_len(self) -> usize {
        match self {
            Self::SysExEnd1 | Self::SingleByte => 1,
            Self::SystemCommon2 | Self::SysExEnd2 | Self::ProgramChange | Self::ChannelPressure => 2,
            _ => 3,
        }
    }
}

/// One 4-byte USB-MIDI event.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiEventPacket {
    /// Cable number and code index.
    pub header: u8,
    /// MIDI status byte.
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl MidiEventPacket {
    /// Build a packet from its four raw bytes.
    pub const fn new(header: u8, status: u8, data1: u8, data2: u8) -> Self {
        Self {
            header,
            status,
            data1,
            data2,
        }
    }

    /// Note-on on cable 0.
    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(
            CODE_IDX_NOTE_ON,
            NOTE_ON | (channel & 0x0F),
            note & 0x7F,
            velocity & 0x7F,
        )
    }

    /// Note-off on cable 0.
    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(
            CODE_IDX_NOTE_OFF,
            NOTE_OFF | (channel & 0x0F),
            note & 0x7F,
            velocity & 0x7F,
        )
    }

    /// Parse the first four bytes of `data`.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < USBD_MIDI_EVENT_SIZE {
            return None;
        }
        Some(Self::new(data[0], data[1], data[2], data[3]))
    }

    pub const fn to_bytes(&self) -> [u8; USBD_MIDI_EVENT_SIZE] {
        [self.header, self.status, self.data1, self.data2]
    }

    /// Serialise into a byte slice for the bulk IN endpoint.
    /// Returns the number of bytes written (0 if `buf` is too small).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < USBD_MIDI_EVENT_SIZE {
            return 0;
        }
        buf[..USBD_MIDI_EVENT_SIZE].copy_from_slice(&self.to_bytes());
        USBD_MIDI_EVENT_SIZE
    }

    pub const fn cable(&self) -> u8 {
        self.header >> 4
    }

    pub const fn code_index(&self) -> CodeIndex {
        CodeIndex::from_nibble(self.header)
    }

    /// Number of meaningful MIDI bytes after the header.
    pub const fn message_len(&self) -> usize {
        self.code_index().midi_len()
    }

    /// Hosts pad short bulk transfers with all-zero events.
    pub const fn is_padding(&self) -> bool {
        self.header == 0 && self.status == 0 && self.data1 == 0 && self.data2 == 0
    }
}
