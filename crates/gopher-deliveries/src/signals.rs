//! Button signals arriving from the messaging side.
//!
//! Every leaf that reacts to a button holds its own [`ButtonLatch`], subscribed to the
//! [`Button`] at construction. A press is delivered to every live latch; whether it
//! sticks depends on the latch being armed.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::config::ButtonConfig;

#[derive(Debug, Default)]
struct LatchState {
    armed: bool,
    pressed: bool,
}

/// One subscriber's view of a button.
///
/// A press only sticks while the latch is armed; a press that arrives while disarmed is
/// dropped, so a stale confirmation never carries over to a node that was not waiting.
#[derive(Debug, Default)]
pub struct ButtonLatch {
    state: Mutex<LatchState>,
}

impl ButtonLatch {
    fn new(armed: bool) -> Self {
        Self {
            state: Mutex::new(LatchState {
                armed,
                pressed: false,
            }),
        }
    }

    pub fn arm(&self) {
        self.state.lock().armed = true;
    }

    /// Stop listening and forget any press not yet taken.
    pub fn disarm(&self) {
        let mut state = self.state.lock();
        state.armed = false;
        state.pressed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.state.lock().armed
    }

    pub fn is_pressed(&self) -> bool {
        self.state.lock().pressed
    }

    /// Consume a latched press.
    pub fn take(&self) -> bool {
        std::mem::take(&mut self.state.lock().pressed)
    }

    fn on_press(&self) -> bool {
        let mut state = self.state.lock();
        state.pressed = state.armed;
        state.pressed
    }
}

/// A named button fanning presses out to its subscribers.
#[derive(Debug, Clone)]
pub struct Button {
    id: Arc<str>,
    subscribers: Arc<Mutex<Vec<Weak<ButtonLatch>>>>,
}

impl Button {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Subscribe a latch that ignores presses until armed.
    pub fn subscribe(&self) -> Arc<ButtonLatch> {
        self.register(ButtonLatch::new(false))
    }

    /// Subscribe a latch that records every press from now on.
    pub fn subscribe_armed(&self) -> Arc<ButtonLatch> {
        self.register(ButtonLatch::new(true))
    }

    fn register(&self, latch: ButtonLatch) -> Arc<ButtonLatch> {
        let latch = Arc::new(latch);
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|s| s.strong_count() > 0);
        subscribers.push(Arc::downgrade(&latch));
        latch
    }

    /// Deliver a press. Returns how many latches kept it.
    pub fn press(&self) -> usize {
        let live: Vec<Arc<ButtonLatch>> = {
            let mut subscribers = self.subscribers.lock();
            subscribers.retain(|s| s.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        let latched = live.iter().filter(|latch| latch.on_press()).count();
        tracing::debug!(button = %self.id, latched, "Button pressed");
        latched
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }
}

/// The go and stop buttons of one robot, named by configuration.
#[derive(Debug, Clone)]
pub struct ButtonBoard {
    go: Button,
    stop: Button,
}

impl ButtonBoard {
    pub fn new(config: &ButtonConfig) -> Self {
        Self {
            go: Button::new(config.go.as_str()),
            stop: Button::new(config.stop.as_str()),
        }
    }

    pub fn go(&self) -> &Button {
        &self.go
    }

    pub fn stop(&self) -> &Button {
        &self.stop
    }

    /// Route a press by button id. `None` for an unknown id.
    pub fn press(&self, id: &str) -> Option<usize> {
        if id == self.go.id() {
            Some(self.go.press())
        } else if id == self.stop.id() {
            Some(self.stop.press())
        } else {
            tracing::warn!(button = id, "Press on unknown button ignored");
            None
        }
    }
}
