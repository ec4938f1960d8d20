//! Edge waiting with debounce, generic over the pin and the delay.

use embedded_hal::digital::InputPin;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::digital::Wait;

/// Wait for a press (falling edge, active-low) and confirm it after
/// `debounce_ms`.  `false` means no press: a pin error or a bounce.
pub async fn pressed<P, D>(btn: &mut P, delay: &mut D, debounce_ms: u32) -> bool
where
    P: InputPin + Wait,
    D: DelayNs,
{
    if btn.wait_for_falling_edge().await.is_err() {
        return false;
    }
    delay.delay_ms(debounce_ms).await;
    btn.is_low().unwrap_or(false)
}

/// Wait for the release (rising edge) and let it settle.  `false` when the
/// pin failed, so no release was seen.
pub async fn released<P, D>(btn: &mut P, delay: &mut D, debounce_ms: u32) -> bool
where
    P: InputPin + Wait,
    D: DelayNs,
{
    if btn.wait_for_rising_edge().await.is_err() {
        return false;
    }
    delay.delay_ms(debounce_ms).await;
    true
}
