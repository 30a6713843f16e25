/* Copyright 2020 Mozilla Foundation
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Diagnostics and the accumulating per-event result.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// A position in the module being validated.
///
/// The validator never interprets locations; it copies them from incoming
/// events into diagnostics so that the driving parser can render them however
/// it likes (byte offset for binary input, interned line/column for text).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// The raw offset supplied by the parser.
    pub offset: usize,
}

impl Location {
    /// Creates a location from a raw parser offset.
    pub fn new(offset: usize) -> Location {
        Location { offset }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.offset)
    }
}

/// Severity of a recorded diagnostic.
///
/// The validator itself only ever emits [`Severity::Error`]; the sink is
/// shared with other producers that also report warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// A diagnostic that does not invalidate the module.
    Warning,
    /// A violation of the specification; the module is invalid.
    Error,
}

/// A single diagnostic recorded during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// How severe this diagnostic is.
    pub severity: Severity,
    /// Where in the input the offending event originated.
    pub loc: Location,
    /// Single-line, human-readable description.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{severity} (at {}): {}", self.loc, self.message)
    }
}

/// An append-only list of diagnostics.
///
/// A [`Validator`](crate::Validator) borrows an `Errors` for its whole
/// lifetime and appends to it; it never reads entries back. Given the same
/// event trace and feature set the recorded list is identical across runs.
#[derive(Debug, Default)]
pub struct Errors {
    list: Vec<ValidationError>,
}

impl Errors {
    /// Creates an empty sink.
    pub fn new() -> Errors {
        Errors::default()
    }

    /// Records an error-severity diagnostic and returns the failing
    /// [`CheckResult`], so call sites can directly propagate it:
    ///
    /// ```ignore
    /// return self.errors.error(loc, "only one memory block allowed");
    /// ```
    pub fn error(&mut self, loc: Location, message: impl Into<String>) -> CheckResult {
        self.list.push(ValidationError {
            severity: Severity::Error,
            loc,
            message: message.into(),
        });
        CheckResult::Error
    }

    /// Returns whether no diagnostics have been recorded.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Iterates over the recorded diagnostics in the order they were emitted.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.list.iter()
    }

    /// Returns the recorded diagnostics as a slice.
    pub fn as_slice(&self) -> &[ValidationError] {
        &self.list
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

/// The outcome of a single validation event.
///
/// Unlike [`std::result::Result`] this is deliberately a two-valued flag with
/// a bitwise-or combinator: every check within an event runs and records its
/// own diagnostics in the [`Errors`] sink, and the event reports `Error` if
/// any of them failed. Nothing short-circuits, so one malformed declaration
/// can produce several diagnostics while still yielding a single outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum CheckResult {
    /// All checks for the event passed.
    Ok,
    /// At least one check failed; details are in the [`Errors`] sink.
    Error,
}

impl CheckResult {
    /// Returns whether the event passed.
    pub fn is_ok(self) -> bool {
        self == CheckResult::Ok
    }

    /// Returns whether the event recorded at least one error.
    pub fn is_err(self) -> bool {
        self == CheckResult::Error
    }
}

impl BitOr for CheckResult {
    type Output = CheckResult;

    fn bitor(self, rhs: CheckResult) -> CheckResult {
        if self.is_err() || rhs.is_err() {
            CheckResult::Error
        } else {
            CheckResult::Ok
        }
    }
}

impl BitOrAssign for CheckResult {
    fn bitor_assign(&mut self, rhs: CheckResult) {
        *self = *self | rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_accumulates() {
        let mut result = CheckResult::Ok;
        result |= CheckResult::Ok;
        assert!(result.is_ok());
        result |= CheckResult::Error;
        assert!(result.is_err());
        // An error is sticky no matter what is or-ed in afterwards.
        result |= CheckResult::Ok;
        assert!(result.is_err());
    }

    #[test]
    fn sink_preserves_order() {
        let mut errors = Errors::new();
        let _ = errors.error(Location::new(1), "first");
        let _ = errors.error(Location::new(2), "second");
        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.as_slice()[0].loc, Location::new(1));
    }
}
