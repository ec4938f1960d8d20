//! Key → note mapping.

use crate::board::BoardEvent;
use crate::config::{MIDI_CHANNEL, VELOCITY};
use crate::midi::packet::MidiEventPacket;

/// Map a board event to the MIDI event it plays, if any.
pub fn packet_for(event: BoardEvent) -> Option<MidiEventPacket> {
    match event {
        BoardEvent::KeyPressed(key) => {
            Some(MidiEventPacket::note_on(MIDI_CHANNEL, key.note(), VELOCITY))
        }
        BoardEvent::KeyReleased(key) => {
            Some(MidiEventPacket::note_off(MIDI_CHANNEL, key.note(), VELOCITY))
        }
        BoardEvent::Unassigned(_) => None,
    }
}
