//! Four-digit editors driven by the three buttons
//!
//! INC and DEC change the digit under the cursor and never produce an
//! invalid value: hours stay within 00-23, minutes within 00-59 and the
//! calibration magnitude within 0-511.

use cifra_hal::RtcTime;

use crate::calibration::Calibration;
use crate::mechanism::MechPosition;
use crate::silent::{SilentHours, ZeroWidthPolicy};

pub const DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorKind {
    /// HH:MM
    Time,
    /// HH-HH, window start then end
    SilentHours,
    /// ±NNN, digit 0 is the sign
    Calibration,
}

/// Value produced when an editor is committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditorValue {
    Time(RtcTime),
    SilentHours(SilentHours),
    Calibration(Calibration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Editor {
    kind: EditorKind,
    /// Calibration uses digit 0 as the sign flag (1 = negative)
    digits: [u8; DIGITS],
    cursor: usize,
    zero_width: ZeroWidthPolicy,
}

impl Editor {
    pub fn time(shown: MechPosition) -> Self {
        Self::with_digits(EditorKind::Time, split_pair(shown.hour(), shown.minute()))
    }

    pub fn silent_hours(hours: SilentHours) -> Self {
        let mut editor = Self::with_digits(
            EditorKind::SilentHours,
            split_pair(hours.start(), hours.end()),
        );
        editor.zero_width = hours.zero_width();
        editor
    }

    pub fn calibration(calibration: Calibration) -> Self {
        let magnitude = calibration.magnitude();
        Self::with_digits(
            EditorKind::Calibration,
            [
                u8::from(calibration.is_negative()),
                (magnitude / 100) as u8,
                (magnitude / 10 % 10) as u8,
                (magnitude % 10) as u8,
            ],
        )
    }

    fn with_digits(kind: EditorKind, digits: [u8; DIGITS]) -> Self {
        Self {
            kind,
            digits,
            cursor: 0,
            zero_width: ZeroWidthPolicy::default(),
        }
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn digits(&self) -> [u8; DIGITS] {
        self.digits
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move to the next digit; true once the cursor passes the last one
    pub fn advance(&mut self) -> bool {
        self.cursor += 1;
        self.cursor >= DIGITS
    }

    pub fn increment(&mut self) {
        let Some(&digit) = self.digits.get(self.cursor) else {
            return;
        };
        match self.kind {
            EditorKind::Time if self.cursor >= 2 => {
                let max = if self.cursor == 2 { 5 } else { 9 };
                if digit < max {
                    self.digits[self.cursor] += 1;
                }
            }
            EditorKind::Time => increment_hour_digit(&mut self.digits, 0, self.cursor),
            EditorKind::SilentHours => {
                let tens = if self.cursor < 2 { 0 } else { 2 };
                increment_hour_digit(&mut self.digits, tens, self.cursor);
            }
            EditorKind::Calibration => self.increment_calibration(),
        }
    }

    pub fn decrement(&mut self) {
        if self.kind == EditorKind::Calibration && self.cursor == 0 {
            self.digits[0] ^= 1;
            return;
        }
        if let Some(digit) = self.digits.get_mut(self.cursor) {
            *digit = digit.saturating_sub(1);
        }
    }

    fn increment_calibration(&mut self) {
        let d = &mut self.digits;
        match self.cursor {
            0 => d[0] ^= 1,
            1 => {
                if d[1] < 5 {
                    d[1] += 1;
                    if d[1] == 5 {
                        d[2] = d[2].min(1);
                        if d[2] == 1 {
                            d[3] = d[3].min(1);
                        }
                    }
                }
            }
            2 => {
                let max = if d[1] == 5 { 1 } else { 9 };
                if d[2] < max {
                    d[2] += 1;
                    if d[1] == 5 && d[2] == 1 {
                        d[3] = d[3].min(1);
                    }
                }
            }
            _ => {
                let max = if d[1] == 5 && d[2] == 1 { 1 } else { 9 };
                if d[3] < max {
                    d[3] += 1;
                }
            }
        }
    }

    pub fn value(&self) -> Option<EditorValue> {
        let [a, b, c, d] = self.digits;
        match self.kind {
            EditorKind::Time => RtcTime::new(a * 10 + b, c * 10 + d, 0).map(EditorValue::Time),
            EditorKind::SilentHours => SilentHours::new(a * 10 + b, c * 10 + d)
                .ok()
                .map(|hours| EditorValue::SilentHours(hours.with_zero_width(self.zero_width))),
            EditorKind::Calibration => {
                let magnitude = u16::from(b) * 100 + u16::from(c) * 10 + u16::from(d);
                Calibration::from_sign_magnitude(a == 1, magnitude)
                    .ok()
                    .map(EditorValue::Calibration)
            }
        }
    }
}

fn split_pair(first: u8, second: u8) -> [u8; DIGITS] {
    [first / 10, first % 10, second / 10, second % 10]
}

/// Tens 0-2, units 0-9 (0-3 once the tens digit is 2)
fn increment_hour_digit(digits: &mut [u8; DIGITS], tens: usize, cursor: usize) {
    if cursor == tens {
        if digits[tens] < 2 {
            digits[tens] += 1;
            if digits[tens] == 2 {
                digits[tens + 1] = digits[tens + 1].min(3);
            }
        }
    } else {
        let max = if digits[tens] == 2 { 3 } else { 9 };
        if digits[cursor] < max {
            digits[cursor] += 1;
        }
    }
}
