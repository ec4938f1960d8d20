//! USB MIDI device - embassy-usb stack on the nRF52840 USBD peripheral.
//!
//! Initialises the device with one MIDI streaming function and runs it
//! from a dedicated task that obeys [`StackCommand`]s.  Bus callbacks
//! are turned into [`UsbEvent`]s for the dispatcher.

use crate::config::{self, UsbdConfig};
use crate::error::Error;
use crate::event_queue;
use crate::midi::class::{MidiReceiver, MidiSender};
use crate::midi::MidiEvent;
use crate::usb::state::{DeviceRunner, PowerTracker, StackCommand, StackState};
use crate::usb::{UsbEvent, UsbStack};
use defmt::{debug, info, warn};
use embassy_futures::join::join;
use embassy_futures::select::{select, Either};
use embassy_nrf::usb::vbus_detect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::midi::MidiClass;
use embassy_usb::control::{InResponse, OutResponse, Request, RequestType};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => vbus_detect::InterruptHandler;
});

/// VBUS source: the POWER peripheral when power detection is on,
/// otherwise a software source that always reports power.
#[cfg(feature = "power-detection")]
pub type Vbus = vbus_detect::HardwareVbusDetect;
#[cfg(not(feature = "power-detection"))]
pub type Vbus = &'static vbus_detect::SoftwareVbusDetect;

pub type UsbDriver = Driver<'static, peripherals::USBD, Vbus>;

static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static USB_EVENT_HANDLER: StaticCell<StackEventHandler> = StaticCell::new();
#[cfg(not(feature = "power-detection"))]
static SOFTWARE_VBUS: StaticCell<vbus_detect::SoftwareVbusDetect> = StaticCell::new();

static STACK_COMMANDS: Channel<CriticalSectionRawMutex, StackCommand, 4> = Channel::new();

/// Turns device-level callbacks into application events.
struct StackEventHandler {
    power: PowerTracker,
}

impl embassy_usb::Handler for StackEventHandler {
    fn enabled(&mut self, enabled: bool) {
        let events = self.power.on_enabled(enabled);
        if events.is_empty() {
            debug!("USB enabled({}) repeated", enabled);
        }
        for &event in events {
            event_queue::try_post(event);
        }
    }

    fn reset(&mut self) {
        debug!("USB bus reset");
    }

    fn addressed(&mut self, addr: u8) {
        debug!("USB addressed: {}", addr);
    }

    fn configured(&mut self, configured: bool) {
        info!("USB configured: {}", configured);
    }

    fn suspended(&mut self, suspended: bool) {
        if suspended {
            event_queue::try_post(UsbEvent::Suspend);
        } else {
            event_queue::try_post(UsbEvent::Resume);
        }
    }

    fn control_out(&mut self, req: Request, _data: &[u8]) -> Option<OutResponse> {
        if req.request_type == RequestType::Class {
            event_queue::try_post(MidiEvent::ClassRequest);
        }
        None
    }

    fn control_in<'a>(&'a mut self, req: Request, _buf: &'a mut [u8]) -> Option<InResponse<'a>> {
        if req.request_type == RequestType::Class {
            event_queue::try_post(MidiEvent::ClassRequest);
        }
        None
    }
}

/// Build result containing the USB device runner and the two MIDI halves.
pub struct UsbMidiDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub sender: MidiSender,
    pub receiver: MidiReceiver,
}

/// Initialise the USB stack and create the MIDI streaming device.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD, usbd_config: &UsbdConfig) -> UsbMidiDevice {
    if usbd_config.enable_sof {
        // embassy-usb does not surface start-of-frame to handlers.
        warn!("SOF events requested but not available - UsbEvent::Sof will not be posted");
    }

    #[cfg(feature = "power-detection")]
    let vbus = vbus_detect::HardwareVbusDetect::new(Irqs);
    #[cfg(not(feature = "power-detection"))]
    let vbus: Vbus = SOFTWARE_VBUS.init(vbus_detect::SoftwareVbusDetect::new(true, true));

    let driver = Driver::new(usbd, Irqs, vbus);

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 64]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let handler = USB_EVENT_HANDLER.init(StackEventHandler {
        power: PowerTracker::new(),
    });
    builder.handler(handler);

    let midi = MidiClass::new(
        &mut builder,
        usbd_config.midi.in_jacks,
        usbd_config.midi.out_jacks,
        usbd_config.midi.max_packet_size,
    );
    let (sender, receiver) = midi.split();

    let device = builder.build();

    info!(
        "USB MIDI device initialised ({} in / {} out jacks)",
        usbd_config.midi.in_jacks, usbd_config.midi.out_jacks
    );

    UsbMidiDevice {
        device,
        sender,
        receiver,
    }
}

/// Dispatcher-side controls; commands go to [`run_usb_device`].
pub struct UsbControl {
    state: StackState,
}

impl UsbControl {
    pub const fn new() -> Self {
        Self {
            state: StackState::new(),
        }
    }

    fn send(&self, command: Option<StackCommand>) -> Result<(), Error> {
        match command {
            Some(command) => STACK_COMMANDS.try_send(command).map_err(|_| Error::Usb),
            None => Ok(()),
        }
    }

    fn send_or_warn(&self, command: Option<StackCommand>) {
        if self.send(command).is_err() {
            warn!("USB command queue full - {} dropped", command);
        }
    }
}

impl UsbStack for UsbControl {
    fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    fn enable(&mut self) {
        self.state.enable();
    }

    fn disable(&mut self) {
        let command = self.state.disable();
        self.send_or_warn(command);
    }

    fn start(&mut self) {
        let command = self.state.start();
        self.send_or_warn(command);
    }

    fn stop(&mut self) {
        let command = self.state.stop();
        self.send_or_warn(command);
    }

    fn enable_power_events(&mut self) -> Result<(), Error> {
        let command = self.state.enable_power_events()?;
        self.send(Some(command))
    }
}

/// Serve the bus until cancelled.
async fn serve(device: &mut UsbDevice<'static, UsbDriver>) -> ! {
    loop {
        device.run_until_suspend().await;
        device.wait_resume().await;
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// One half consumes [`StackCommand`]s, the other serves the bus.  The
/// device is parked until started (or until VBUS supervision is enabled)
/// and only a stop cancels it; every cancellation is followed by
/// `disable()`.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");

    let run: Signal<NoopRawMutex, ()> = Signal::new();
    // Carries whether the device keeps serving after the stop.
    let stop: Signal<NoopRawMutex, bool> = Signal::new();

    let commands = async {
        let mut runner = DeviceRunner::new();
        loop {
            let command = STACK_COMMANDS.receive().await;
            let step = runner.apply(command);
            debug!("USB command {}: {}", command, step);

            if step.run {
                run.signal(());
            }
            if step.started {
                event_queue::post(UsbEvent::Started).await;
            }
            if step.stop {
                stop.signal(runner.should_run());
            }
        }
    };

    let bus = async {
        loop {
            run.wait().await;
            loop {
                let keep_running = match select(serve(&mut device), stop.wait()).await {
                    Either::First(never) => match never {},
                    Either::Second(keep_running) => keep_running,
                };
                device.disable().await;
                event_queue::post(UsbEvent::Stopped).await;
                if !keep_running {
                    break;
                }
            }
        }
    };

    join(commands, bus).await;
    defmt::panic!("USB device task exited")
}
