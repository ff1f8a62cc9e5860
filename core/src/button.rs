//! Button debouncing and short/long press classification
//!
//! `Debouncer` turns raw level samples into clean edges. `PressDetector`
//! takes those edges and produces at most one `ButtonEvent` per gesture.
//! Only one button may be held at a time: pressing a second one cancels
//! the gesture and nothing is reported until every button is released.
#![deny(unsafe_code)]

use crate::events::{Button, ButtonEvent};

/// Accepts a level once it has been sampled unchanged `samples` times
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    samples: u8,
    stable: bool,
    count: u8,
}

impl Debouncer {
    pub const fn new(samples: u8) -> Self {
        Self {
            samples,
            stable: false,
            count: 0,
        }
    }

    pub fn level(&self) -> bool {
        self.stable
    }

    /// Feed one sample; returns the new level when it changes
    pub fn update(&mut self, sample: bool) -> Option<bool> {
        if sample == self.stable {
            self.count = 0;
            return None;
        }
        self.count += 1;
        if self.count < self.samples {
            return None;
        }
        self.count = 0;
        self.stable = sample;
        Some(sample)
    }
}

#[derive(Debug, Clone, Copy)]
struct Held {
    button: Button,
    since_ms: u64,
    long_sent: bool,
    cancelled: bool,
    /// Buttons currently down, the first one included
    down: u8,
}

/// Turns debounced edges into press gestures
#[derive(Debug)]
pub struct PressDetector {
    long_press_ms: u64,
    held: Option<Held>,
}

impl PressDetector {
    pub const fn new(long_press_ms: u64) -> Self {
        Self {
            long_press_ms,
            held: None,
        }
    }

    /// Feed a debounced edge; short presses are reported on release
    pub fn on_edge(&mut self, button: Button, pressed: bool, now_ms: u64) -> Option<ButtonEvent> {
        let Some(held) = self.held.as_mut() else {
            if pressed {
                self.held = Some(Held {
                    button,
                    since_ms: now_ms,
                    long_sent: false,
                    cancelled: false,
                    down: 1,
                });
            }
            return None;
        };

        if pressed {
            if held.button != button {
                debug!("Multiple buttons pressed, gesture cancelled");
                held.cancelled = true;
                held.down = held.down.saturating_add(1);
            }
            return None;
        }

        held.down = held.down.saturating_sub(1);
        if held.down > 0 {
            if held.button == button {
                held.cancelled = true;
            }
            return None;
        }

        let held = *held;
        self.held = None;
        if held.cancelled || held.long_sent || held.button != button {
            None
        } else {
            Some(ButtonEvent::short(button))
        }
    }

    /// Report a long press once the hold time passes
    pub fn poll(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let held = self.held.as_mut()?;
        if held.cancelled || held.long_sent {
            return None;
        }
        if now_ms.saturating_sub(held.since_ms) >= self.long_press_ms {
            held.long_sent = true;
            return Some(ButtonEvent::long(held.button));
        }
        None
    }
}
