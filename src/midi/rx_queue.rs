//! Received-event FIFO between the bulk OUT endpoint and the dispatcher.
//!
//! A single bulk transfer carries up to 16 events.  Each one is queued
//! separately so the dispatcher sees one `RxDone` per event and pulls
//! exactly one packet per notification.

use crate::config::{RX_BUFFER_SIZE, USBD_MIDI_EVENT_SIZE};
use crate::error::Error;
use crate::midi::packet::MidiEventPacket;
use heapless::Deque;

/// Capacity in events.
pub const RX_QUEUE_EVENTS: usize = RX_BUFFER_SIZE / USBD_MIDI_EVENT_SIZE;

/// Outcome of queueing one bulk transfer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Queued {
    pub accepted: usize,
    pub dropped: usize,
}

pub struct RxQueue {
    events: Deque<MidiEventPacket, RX_QUEUE_EVENTS>,
}

impl RxQueue {
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
        }
    }

    /// Split a bulk transfer into events and queue them.
    ///
    /// Trailing bytes that do not form a whole event and all-zero padding
    /// events are skipped.  When the queue is full the newest events are
    /// dropped.
    pub fn push_transfer(&mut self, data: &[u8]) -> Queued {
        let mut queued = Queued::default();

        for chunk in data.chunks_exact(USBD_MIDI_EVENT_SIZE) {
            let Some(packet) = MidiEventPacket::from_bytes(chunk) else {
                continue;
            };
            if packet.is_padding() {
                continue;
            }
            match self.events.push_back(packet) {
                Ok(()) => queued.accepted += 1,
                Err(_) => queued.dropped += 1,
            }
        }

        queued
    }

    /// Dequeue the oldest event.
    pub fn get(&mut self) -> Result<MidiEventPacket, Error> {
        self.events.pop_front().ok_or(Error::RxEmpty)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for RxQueue {
    fn default() -> Self {
        Self::new()
    }
}
