//! `embassy-usb` MIDI class glue.
//!
//! The class is split into its bulk IN (sender) and bulk OUT (receiver)
//! halves, each serviced by its own task:
//!
//! - the RX task reports port open/close and queues received events
//! - the TX task drains the outgoing queue and reports each completion
//!
//! [`MidiPortHandle`] is the dispatcher's side of both queues.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::{MIDI_MAX_PACKET_SIZE, TX_QUEUE_DEPTH, USBD_MIDI_EVENT_SIZE};
use crate::error::Error;
use crate::event_queue;
use crate::midi::packet::MidiEventPacket;
use crate::midi::rx_queue::RxQueue;
use crate::midi::{MidiEvent, MidiPort};
use crate::usb::device::UsbDriver;
use defmt::{debug, info, warn};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::midi::{Receiver, Sender};
use embassy_usb::driver::EndpointError;

pub type MidiSender = Sender<'static, UsbDriver>;
pub type MidiReceiver = Receiver<'static, UsbDriver>;

static TX_QUEUE: Channel<CriticalSectionRawMutex, MidiEventPacket, TX_QUEUE_DEPTH> =
    Channel::new();
static RX_QUEUE: Mutex<CriticalSectionRawMutex, RefCell<RxQueue>> =
    Mutex::new(RefCell::new(RxQueue::new()));
static PORT_OPEN: AtomicBool = AtomicBool::new(false);

/// Dispatcher handle on the MIDI class queues.
pub struct MidiPortHandle;

impl MidiPort for MidiPortHandle {
    fn write(&mut self, packet: &MidiEventPacket) -> Result<(), Error> {
        if !PORT_OPEN.load(Ordering::Acquire) {
            return Err(Error::Disconnected);
        }
        TX_QUEUE
            .try_send(*packet)
            .map_err(|_| Error::BufferOverflow)
    }

    fn get(&mut self) -> Result<MidiEventPacket, Error> {
        RX_QUEUE.lock(|q| q.borrow_mut().get())
    }
}

/// Bulk OUT servicing - runs forever, across connections.
pub async fn rx_task(mut receiver: MidiReceiver) -> ! {
    let mut buf = [0u8; MIDI_MAX_PACKET_SIZE as usize];

    loop {
        receiver.wait_connection().await;
        PORT_OPEN.store(true, Ordering::Release);
        event_queue::post(MidiEvent::PortOpen).await;

        loop {
            match receiver.read_packet(&mut buf).await {
                Ok(n) => {
                    let queued = RX_QUEUE.lock(|q| q.borrow_mut().push_transfer(&buf[..n]));
                    if queued.dropped > 0 {
                        warn!("MIDI rx queue full - dropped {} events", queued.dropped);
                    }
                    for _ in 0..queued.accepted {
                        event_queue::post(MidiEvent::RxDone).await;
                    }
                }
                Err(EndpointError::BufferOverflow) => {
                    warn!("MIDI rx transfer larger than {} bytes", buf.len());
                }
                Err(EndpointError::Disabled) => break,
            }
        }

        PORT_OPEN.store(false, Ordering::Release);
        info!("Midi port closed");
        event_queue::post(MidiEvent::PortClose).await;
    }
}

/// Bulk IN servicing - one USB-MIDI event per bulk packet.
pub async fn tx_task(mut sender: MidiSender) -> ! {
    let mut buf = [0u8; USBD_MIDI_EVENT_SIZE];

    loop {
        sender.wait_connection().await;

        loop {
            let packet = TX_QUEUE.receive().await;
            let n = packet.serialize(&mut buf);
            match sender.write_packet(&buf[..n]).await {
                Ok(()) => {
                    debug!("MIDI tx {:02x}", buf);
                    event_queue::post(MidiEvent::TxDone).await;
                }
                Err(EndpointError::BufferOverflow) => warn!("MIDI tx packet too large"),
                Err(EndpointError::Disabled) => break,
            }
        }
    }
}
