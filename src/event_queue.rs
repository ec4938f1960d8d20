//! Application event queue.
//!
//! Button tasks, the MIDI class tasks and the USB device handler post
//! here; the dispatcher in `main` drains it one event at a time.  The
//! thread-mode executor sleeps (WFE) while the queue is empty.
//!
//! USB lifecycle events have their own channel and are drained first, so
//! a burst of MIDI traffic cannot crowd out a suspend or an unplug.

use crate::config::{EVENT_QUEUE_DEPTH, USB_EVENT_QUEUE_DEPTH};
use crate::dispatch::AppEvent;
use crate::usb::UsbEvent;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

pub struct EventQueue<M: RawMutex> {
    usb: Channel<M, UsbEvent, USB_EVENT_QUEUE_DEPTH>,
    events: Channel<M, AppEvent, EVENT_QUEUE_DEPTH>,
}

impl<M: RawMutex> EventQueue<M> {
    pub const fn new() -> Self {
        Self {
            usb: Channel::new(),
            events: Channel::new(),
        }
    }

    /// Post, waiting for room.
    pub async fn post(&self, event: impl Into<AppEvent>) {
        match event.into() {
            AppEvent::Usb(event) => self.usb.send(event).await,
            event => self.events.send(event).await,
        }
    }

    /// Post without waiting.  Hands the event back if its channel is full.
    pub fn try_post(&self, event: impl Into<AppEvent>) -> Result<(), AppEvent> {
        match event.into() {
            AppEvent::Usb(event) => self
                .usb
                .try_send(event)
                .map_err(|_| AppEvent::Usb(event)),
            event => self.events.try_send(event).map_err(|_| event),
        }
    }

    /// Wait for the next event, USB lifecycle events first.
    pub async fn next(&self) -> AppEvent {
        if let Ok(event) = self.usb.try_receive() {
            return event.into();
        }
        match select(self.usb.receive(), self.events.receive()).await {
            Either::First(event) => event.into(),
            Either::Second(event) => event,
        }
    }
}

impl<M: RawMutex> Default for EventQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
mod global {
    use super::EventQueue;
    use crate::dispatch::AppEvent;
    use defmt::warn;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    static EVENTS: EventQueue<CriticalSectionRawMutex> = EventQueue::new();

    /// Post from async context, waiting for room.
    pub async fn post(event: impl Into<AppEvent>) {
        EVENTS.post(event).await;
    }

    /// Post from a synchronous callback.  Drops the event if its channel
    /// is full.
    pub fn try_post(event: impl Into<AppEvent>) {
        if let Err(event) = EVENTS.try_post(event) {
            warn!("Event queue full - dropping {}", event);
        }
    }

    /// Wait for the next event.
    pub async fn next() -> AppEvent {
        EVENTS.next().await
    }
}

#[cfg(feature = "embedded")]
pub use global::{next, post, try_post};
