//! GPIO button input with async debouncing.
//!
//! Four physical buttons (active-low with internal pull-up), one per
//! [`Key`].  Each button is handled by an async task that waits for a GPIO
//! edge, debounces it, and posts a press or release [`BoardEvent`] to the
//! application queue.  Nothing is posted until [`ButtonGate::enable`] has
//! been called.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::board::{debounce, BoardEvent, Buttons, Key};
use crate::config::BUTTON_DEBOUNCE_MS;
use crate::error::Error;
use crate::event_queue;
use defmt::{info, warn};
use embassy_time::Delay;
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

static BUTTONS_ENABLED: AtomicBool = AtomicBool::new(false);

/// Opens the button tasks' output.
pub struct ButtonGate;

impl Buttons for ButtonGate {
    fn enable(&mut self) -> Result<(), Error> {
        if !BUTTONS_ENABLED.swap(true, Ordering::AcqRel) {
            info!("Buttons enabled");
        }
        Ok(())
    }
}

fn enabled() -> bool {
    BUTTONS_ENABLED.load(Ordering::Acquire)
}

/// Run a single button polling loop.
///
/// Waits for the pin to go low (pressed), debounces, posts the press,
/// then waits for release and posts that too.
pub async fn button_task<P>(mut btn: P, key: Key) -> !
where
    P: InputPin + Wait,
{
    let mut delay = Delay;

    loop {
        if !debounce::pressed(&mut btn, &mut delay, BUTTON_DEBOUNCE_MS).await {
            continue;
        }
        if enabled() {
            info!("Button: {} pressed", key);
            event_queue::post(BoardEvent::KeyPressed(key)).await;
        }

        // Wait for release to avoid repeat triggers.
        if !debounce::released(&mut btn, &mut delay, BUTTON_DEBOUNCE_MS).await {
            warn!("Button: {} release lost", key);
            continue;
        }
        if enabled() {
            info!("Button: {} released", key);
            event_queue::post(BoardEvent::KeyReleased(key)).await;
        }
    }
}
