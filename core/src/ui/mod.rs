//! Display task state machine
//!
//! Consumes `DisplayEvent`s from the button and clock tasks and turns
//! committed edits into `ClockCommand`s. It never touches hardware; the
//! board renders `UiController::mode()` however its panel likes.
#![deny(unsafe_code)]

pub mod editor;

pub use editor::{Editor, EditorKind, EditorValue};

use crate::calibration::Calibration;
use crate::config::UiConfig;
use crate::events::{Button, ButtonEvent, ClockCommand, DisplayEvent, ErrorPhase, Press, SyncPhase};
use crate::mechanism::MechPosition;
use crate::silent::SilentHours;
use crate::Stores;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiMode {
    /// Showing the time
    Normal,
    /// User-initiated edit of time, silent hours or calibration
    ManualSet(Editor),
    /// Buttons are ignored until the clock task reports `End`
    Syncing(SyncPhase),
    Error(ErrorPhase),
    /// Setup that must end in a time entry before returning to `Normal`
    ForcedSetup(Editor),
}

/// What the UI needs to know about the clock when handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiContext {
    pub shown: MechPosition,
    pub silent_hours: SilentHours,
    pub calibration: Calibration,
    /// The RTC is inside the silent window; the flaps may be lagging
    pub silent_now: bool,
}

impl UiContext {
    pub fn from_stores(stores: &Stores<'_>) -> Self {
        Self {
            shown: stores.mech.position(),
            silent_hours: stores.silent.silent_hours(),
            calibration: stores.calibration.calibration(),
            silent_now: stores.silent.silent_now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UiOutcome {
    Ignored,
    /// Mode or display state changed; redraw
    Updated,
    /// Redraw and forward the command to the clock task
    Command(ClockCommand),
}

pub struct UiController {
    config: UiConfig,
    mode: UiMode,
    display_on: bool,
    last_input_ms: u64,
    last_error: Option<ErrorPhase>,
}

impl UiController {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            mode: UiMode::Normal,
            display_on: true,
            last_input_ms: 0,
            last_error: None,
        }
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    /// Most recent sensor or sync error, cleared by the next successful sync
    pub fn last_error(&self) -> Option<ErrorPhase> {
        self.last_error
    }

    pub fn handle(&mut self, event: DisplayEvent, ctx: &UiContext, now_ms: u64) -> UiOutcome {
        debug!("Display event {}", event.code());
        let outcome = match event {
            DisplayEvent::ForceSetup => {
                info!("Forced setup");
                self.mode = UiMode::ForcedSetup(Editor::silent_hours(ctx.silent_hours));
                UiOutcome::Updated
            }
            DisplayEvent::Button(button) => {
                if !self.display_on {
                    self.wake(now_ms);
                    return UiOutcome::Updated;
                }
                self.on_button(button, ctx)
            }
            DisplayEvent::Sync(SyncPhase::End) => {
                self.last_error = None;
                self.mode = UiMode::Normal;
                UiOutcome::Updated
            }
            DisplayEvent::Sync(phase) => {
                self.mode = UiMode::Syncing(phase);
                UiOutcome::Updated
            }
            DisplayEvent::Error(phase) => self.on_error(phase, ctx),
        };
        self.wake(now_ms);
        outcome
    }

    /// Blank the display after the idle timeout; true if anything changed
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if !self.display_on || matches!(self.mode, UiMode::Syncing(_)) {
            return false;
        }
        if now_ms.saturating_sub(self.last_input_ms) < self.config.display_off_ms {
            return false;
        }
        debug!("Display off");
        self.display_on = false;
        if let UiMode::ManualSet(_) = self.mode {
            info!("Edit abandoned");
            self.mode = UiMode::Normal;
        }
        true
    }

    fn wake(&mut self, now_ms: u64) {
        self.display_on = true;
        self.last_input_ms = now_ms;
    }

    fn on_error(&mut self, phase: ErrorPhase, ctx: &UiContext) -> UiOutcome {
        warn!("Clock reported error {}", DisplayEvent::Error(phase).code());
        match phase {
            ErrorPhase::Start => self.mode = UiMode::Error(phase),
            ErrorPhase::SensorHour | ErrorPhase::SensorDay => {
                self.last_error = Some(phase);
                self.mode = UiMode::Normal;
            }
            ErrorPhase::TooManySyncAttempts => {
                self.last_error = Some(phase);
                self.mode = UiMode::ForcedSetup(Editor::time(ctx.shown));
            }
        }
        UiOutcome::Updated
    }

    fn on_button(&mut self, event: ButtonEvent, ctx: &UiContext) -> UiOutcome {
        match self.mode {
            UiMode::Normal => self.on_normal_button(event, ctx),
            UiMode::ManualSet(editor) => self.on_edit_button(editor, false, event, ctx),
            UiMode::ForcedSetup(editor) => self.on_edit_button(editor, true, event, ctx),
            UiMode::Syncing(_) => UiOutcome::Ignored,
            UiMode::Error(_) => {
                self.mode = UiMode::Normal;
                UiOutcome::Updated
            }
        }
    }

    fn on_normal_button(&mut self, event: ButtonEvent, ctx: &UiContext) -> UiOutcome {
        if event.press != Press::Long {
            // SET retries a sync that stopped on a sensor
            let sensor_error = matches!(
                self.last_error,
                Some(ErrorPhase::SensorHour | ErrorPhase::SensorDay)
            );
            if event.button == Button::Set && sensor_error {
                info!("Sync retry requested");
                return UiOutcome::Command(ClockCommand::Resync);
            }
            return UiOutcome::Ignored;
        }
        let editor = match event.button {
            Button::Set => {
                if ctx.silent_now {
                    debug!("Time entry blocked in silent period");
                    return UiOutcome::Ignored;
                }
                Editor::time(ctx.shown)
            }
            Button::Inc => Editor::silent_hours(ctx.silent_hours),
            Button::Dec => Editor::calibration(ctx.calibration),
        };
        self.mode = UiMode::ManualSet(editor);
        UiOutcome::Updated
    }

    fn on_edit_button(
        &mut self,
        mut editor: Editor,
        forced: bool,
        event: ButtonEvent,
        ctx: &UiContext,
    ) -> UiOutcome {
        let commit = match (event.button, event.press) {
            (Button::Set, Press::Short) => editor.advance(),
            (Button::Set, Press::Long) => true,
            (Button::Inc, Press::Short) => {
                editor.increment();
                false
            }
            (Button::Dec, Press::Short) => {
                editor.decrement();
                false
            }
            _ => return UiOutcome::Ignored,
        };

        if !commit {
            self.mode = if forced {
                UiMode::ForcedSetup(editor)
            } else {
                UiMode::ManualSet(editor)
            };
            return UiOutcome::Updated;
        }

        let Some(value) = editor.value() else {
            warn!("Edited value rejected");
            return UiOutcome::Ignored;
        };
        info!("Edit committed: {:?}", value);
        let (command, next) = match value {
            EditorValue::Time(time) => {
                (ClockCommand::SetTime(time), UiMode::Syncing(SyncPhase::Start))
            }
            EditorValue::SilentHours(hours) => {
                let next = if forced {
                    UiMode::ForcedSetup(Editor::calibration(ctx.calibration))
                } else {
                    UiMode::Normal
                };
                (ClockCommand::SetSilentHours(hours), next)
            }
            EditorValue::Calibration(calibration) => {
                let next = if forced {
                    UiMode::ForcedSetup(Editor::time(ctx.shown))
                } else {
                    UiMode::Normal
                };
                (ClockCommand::SetCalibration(calibration), next)
            }
        };
        self.mode = next;
        UiOutcome::Command(command)
    }
}
