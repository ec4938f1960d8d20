//! usbd-midi-keys firmware entry point (nRF52840-DK).
//!
//! Brings up logging, clocks, the time driver, LEDs/buttons and the USB
//! MIDI device, then drains the application event queue forever.  The
//! executor puts the CPU to sleep whenever the queue is empty.

#![no_std]
#![no_main]

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::config::{Config as NrfConfig, HfclkSource, LfclkSource};
use embassy_nrf::gpio::{AnyPin, Input, Level, Output, OutputDrive, Pin, Pull};
use embassy_usb::UsbDevice;
use usbd_midi_keys::board::buttons::{self, ButtonGate};
use usbd_midi_keys::board::leds::BoardLeds;
use usbd_midi_keys::board::Key;
use usbd_midi_keys::config::{self, UsbdConfig};
use usbd_midi_keys::dispatch::App;
use usbd_midi_keys::error::Error;
use usbd_midi_keys::event_queue;
use usbd_midi_keys::midi::class::{self, MidiPortHandle, MidiReceiver, MidiSender};
use usbd_midi_keys::usb;
use usbd_midi_keys::usb::device::{self, UsbControl, UsbDriver, UsbMidiDevice};
use {defmt_rtt as _, panic_probe as _};

/// Report and halt.
fn fatal(err: Error) -> ! {
    defmt::panic!("Fatal error: {}", err)
}

#[embassy_executor::task]
async fn usb_task(usb_device: UsbDevice<'static, UsbDriver>) -> ! {
    device::run_usb_device(usb_device).await
}

#[embassy_executor::task]
async fn midi_rx_task(receiver: MidiReceiver) -> ! {
    class::rx_task(receiver).await
}

#[embassy_executor::task]
async fn midi_tx_task(sender: MidiSender) -> ! {
    class::tx_task(sender).await
}

#[embassy_executor::task(pool_size = 4)]
async fn button_task(pin: AnyPin, key: Key) -> ! {
    buttons::button_task(Input::new(pin, Pull::Up), key).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // USB needs the crystal HF clock; init blocks until the LF clock
    // runs and starts the RTC1 time driver on top of it.
    let mut nrf_config = NrfConfig::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    nrf_config.lfclk_source = LfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    info!("USBD midi example started.");

    // LEDs and buttons
    let leds = BoardLeds::new(
        [
            Output::new(p.P0_13, Level::High, OutputDrive::Standard),
            Output::new(p.P0_14, Level::High, OutputDrive::Standard),
            Output::new(p.P0_15, Level::High, OutputDrive::Standard),
            Output::new(p.P0_16, Level::High, OutputDrive::Standard),
        ],
        config::LED_ACTIVE_LOW,
    );

    let button_pins = [
        p.P0_11.degrade(),
        p.P0_12.degrade(),
        p.P0_24.degrade(),
        p.P0_25.degrade(),
    ];
    for (pin, key) in button_pins.into_iter().zip(Key::ALL) {
        unwrap!(spawner.spawn(button_task(pin, key)));
    }

    // USB
    let usbd_config = UsbdConfig::new();
    let UsbMidiDevice {
        device: usb_device,
        sender,
        receiver,
    } = device::init(p.USBD, &usbd_config);

    unwrap!(spawner.spawn(usb_task(usb_device)));
    unwrap!(spawner.spawn(midi_rx_task(receiver)));
    unwrap!(spawner.spawn(midi_tx_task(sender)));

    let mut control = UsbControl::new();
    if let Err(err) = usb::start_stack(&mut control, &usbd_config) {
        fatal(err);
    }

    let mut app = App::new(control, MidiPortHandle, ButtonGate, leds);

    loop {
        let event = event_queue::next().await;
        if let Err(err) = app.handle(event) {
            fatal(err);
        }
    }
}
