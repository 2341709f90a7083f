//! Recovery timers on `setTimeout`.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use smartbar_core::{RecoveryTimer, TimerToken};

/// [`RecoveryTimer`] backed by browser timeouts.
///
/// An elapsed timer calls `on_fire` with its token; the host then hands the
/// token to the engine.
pub struct BrowserTimer {
    pending: HashMap<TimerToken, Timeout>,
    on_fire: Rc<dyn Fn(TimerToken)>,
}

impl BrowserTimer {
    pub fn new(on_fire: impl Fn(TimerToken) + 'static) -> Self {
        Self {
            pending: HashMap::new(),
            on_fire: Rc::new(on_fire),
        }
    }

    /// Forget a timeout that has already fired.
    ///
    /// Called from inside the timeout's own callback, so the handle is
    /// leaked instead of dropped.
    pub fn release_fired(&mut self, token: TimerToken) {
        if let Some(timeout) = self.pending.remove(&token) {
            let _ = timeout.forget();
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl RecoveryTimer for BrowserTimer {
    fn arm(&mut self, token: TimerToken, delay: Duration) {
        let on_fire = Rc::clone(&self.on_fire);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || on_fire(token));
        self.pending.insert(token, timeout);
    }

    fn disarm(&mut self, token: TimerToken) {
        // Dropping a Timeout clears it.
        self.pending.remove(&token);
    }
}
