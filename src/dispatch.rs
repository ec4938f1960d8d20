//! Event dispatch - board, MIDI class and USB stack events to actions.
//!
//! Every handler runs to completion and keeps no state of its own; all
//! state lives behind the [`UsbStack`], [`MidiPort`], [`Buttons`] and
//! [`Indicators`] implementations it is given.

use crate::board::{keymap, BoardEvent, Buttons, Indicators, Led};
use crate::error::Error;
use crate::midi::{MidiEvent, MidiPort};
use crate::usb::{UsbEvent, UsbStack};

/// Anything the dispatcher can be woken for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppEvent {
    Board(BoardEvent),
    Midi(MidiEvent),
    Usb(UsbEvent),
}

impl From<BoardEvent> for AppEvent {
    fn from(e: BoardEvent) -> Self {
        AppEvent::Board(e)
    }
}

impl From<MidiEvent> for AppEvent {
    fn from(e: MidiEvent) -> Self {
        AppEvent::Midi(e)
    }
}

impl From<UsbEvent> for AppEvent {
    fn from(e: UsbEvent) -> Self {
        AppEvent::Usb(e)
    }
}

/// Send the note for a key press/release.  Events without a key action
/// are ignored; write failures are not reported.
pub fn on_board_event<P: MidiPort>(event: BoardEvent, port: &mut P) {
    let Some(packet) = keymap::packet_for(event) else {
        return;
    };
    let _ = port.write(&packet);
}

/// React to a MIDI class notification.
///
/// Fails only if the buttons cannot be enabled when the port opens.
pub fn on_midi_event<P, B, L>(
    event: MidiEvent,
    port: &mut P,
    buttons: &mut B,
    leds: &mut L,
) -> Result<(), Error>
where
    P: MidiPort,
    B: Buttons,
    L: Indicators,
{
    match event {
        MidiEvent::ClassRequest => {}
        MidiEvent::PortOpen => {
            #[cfg(feature = "defmt")]
            defmt::info!("Midi port opened");
            leds.led_on(Led::MidiOpen);
            buttons.enable()?;
        }
        MidiEvent::PortClose => {}
        MidiEvent::TxDone => leds.led_invert(Led::MidiTx),
        MidiEvent::RxDone => {
            match port.get() {
                Ok(_packet) => {
                    #[cfg(feature = "defmt")]
                    {
                        let bytes = _packet.to_bytes();
                        defmt::info!(
                            "MIDI rx cable {} {}: {=[u8]:02x}",
                            _packet.cable(),
                            _packet.code_index(),
                            &bytes[1..=_packet.message_len()]
                        );
                    }
                }
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("MIDI get failed: {}", _err);
                }
            }
            leds.led_invert(Led::MidiRx);
        }
    }
    Ok(())
}

/// React to a USB stack lifecycle event.
pub fn on_usb_event<S, L>(event: UsbEvent, stack: &mut S, leds: &mut L)
where
    S: UsbStack,
    L: Indicators,
{
    match event {
        UsbEvent::Sof => {}
        UsbEvent::Suspend => leds.all_off(),
        UsbEvent::Resume => leds.led_on(Led::UsbResume),
        UsbEvent::Started => {}
        UsbEvent::Stopped => {
            stack.disable();
            leds.all_off();
        }
        UsbEvent::PowerDetected => {
            #[cfg(feature = "defmt")]
            defmt::info!("USB power detected");
            if !stack.is_enabled() {
                stack.enable();
            }
        }
        UsbEvent::PowerRemoved => {
            #[cfg(feature = "defmt")]
            defmt::info!("USB power removed");
            stack.stop();
        }
        UsbEvent::PowerReady => {
            #[cfg(feature = "defmt")]
            defmt::info!("USB ready");
            stack.start();
        }
    }
}

/// The application: the external interfaces the handlers act on.
pub struct App<S, P, B, L> {
    pub stack: S,
    pub port: P,
    pub buttons: B,
    pub leds: L,
}

impl<S, P, B, L> App<S, P, B, L>
where
    S: UsbStack,
    P: MidiPort,
    B: Buttons,
    L: Indicators,
{
    pub fn new(stack: S, port: P, buttons: B, leds: L) -> Self {
        Self {
            stack,
            port,
            buttons,
            leds,
        }
    }

    /// Dispatch one event.  An `Err` is fatal to the caller.
    pub fn handle(&mut self, event: AppEvent) -> Result<(), Error> {
        match event {
            AppEvent::Board(e) => on_board_event(e, &mut self.port),
            AppEvent::Midi(e) => {
                on_midi_event(e, &mut self.port, &mut self.buttons, &mut self.leds)?
            }
            AppEvent::Usb(e) => on_usb_event(e, &mut self.stack, &mut self.leds),
        }
        Ok(())
    }
}
