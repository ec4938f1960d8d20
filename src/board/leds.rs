//! Indicator LEDs on plain `embedded-hal` output pins.

use crate::board::{Indicators, Led, LED_COUNT};
use embedded_hal::digital::StatefulOutputPin;

pub struct BoardLeds<P> {
    pins: [P; LED_COUNT],
    active_low: bool,
}

impl<P: StatefulOutputPin> BoardLeds<P> {
    /// Take ownership of the four LED pins and switch them all off.
    pub fn new(pins: [P; LED_COUNT], active_low: bool) -> Self {
        let mut leds = Self { pins, active_low };
        leds.all_off();
        leds
    }

    /// Whether `led` is currently lit.
    pub fn is_on(&mut self, led: Led) -> bool {
        let active_low = self.active_low;
        let pin = &mut self.pins[led.index()];
        let high = pin.is_set_high().unwrap_or(active_low);
        high != active_low
    }

    fn drive(&mut self, led: Led, lit: bool) {
        let pin = &mut self.pins[led.index()];
        // GPIO writes on this board cannot fail.
        let _ = if lit != self.active_low {
            pin.set_high()
        } else {
            pin.set_low()
        };
    }
}

impl<P: StatefulOutputPin> Indicators for BoardLeds<P> {
    fn led_on(&mut self, led: Led) {
        self.drive(led, true);
    }

    fn led_off(&mut self, led: Led) {
        self.drive(led, false);
    }

    fn led_invert(&mut self, led: Led) {
        let _ = self.pins[led.index()].toggle();
    }
}
