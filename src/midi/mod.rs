//! USB MIDI streaming: event packets, class notifications and the port
//! abstraction the dispatcher writes to and reads from.

pub mod packet;
pub mod rx_queue;

#[cfg(feature = "embedded")]
pub mod class;

use crate::error::Error;
use packet::MidiEventPacket;

/// Class-level notifications from the MIDI streaming interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MidiEvent {
    /// Class-specific control request addressed to the MIDI interfaces.
    ClassRequest,
    /// Host configured the device and the bulk endpoints are live.
    PortOpen,
    /// Endpoints were disabled (reset, unplug, deconfigure).
    PortClose,
    /// One packet finished on the bulk IN endpoint.
    TxDone,
    /// One event is waiting in the receive queue.
    RxDone,
}

/// Write/read access to the MIDI class instance.
pub trait MidiPort {
    /// Queue one event for the host.
    fn write(&mut self, packet: &MidiEventPacket) -> Result<(), Error>;

    /// Dequeue one received event.
    fn get(&mut self) -> Result<MidiEventPacket, Error>;
}
