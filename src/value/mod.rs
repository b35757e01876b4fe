//! Editable field values, their validators, and change notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::session::GroupId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    /// Non-finite numbers are never stored; NaN would defeat the unchanged-value check.
    pub fn is_non_finite(&self) -> bool {
        matches!(self, Self::Number(number) if !number.is_finite())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                write!(f, "{value:.0}")
            }
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Validator verdict for a candidate value.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Accept,
    Replace(FieldValue),
    Reject,
}

pub type Validator = Box<dyn Fn(&FieldValue) -> Validation>;

/// Result of a `set_value` request. None of these are errors for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueOutcome {
    Changed {
        previous: FieldValue,
        current: FieldValue,
        group: Option<GroupId>,
    },
    Unchanged,
    Rejected,
    Malformed,
}

impl ValueOutcome {
    pub const fn changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// The value that was stored, when the request changed anything.
    pub const fn current(&self) -> Option<&FieldValue> {
        match self {
            Self::Changed { current, .. } => Some(current),
            _ => None,
        }
    }

    /// Forwards an accepted change to `notifier`. Call after the field borrow is released;
    /// hosts read the field back from inside the notification.
    pub fn notify(&self, notifier: &dyn ChangeNotifier) {
        let Self::Changed {
            previous,
            current,
            group,
        } = self
        else {
            return;
        };
        match group {
            Some(group) => notifier.notify_value_changed(previous, current, *group),
            None => tracing::warn!(
                old = %previous,
                new = %current,
                "value changed outside an event group; change notification suppressed"
            ),
        }
    }
}

/// Receives accepted value changes. Notifications only flow while an event group is open.
pub trait ChangeNotifier {
    fn current_group(&self) -> Option<GroupId>;
    fn notify_value_changed(&self, old: &FieldValue, new: &FieldValue, group: GroupId);
}

pub type SharedValue = Rc<RefCell<EditableValue>>;

pub struct EditableValue {
    raw: FieldValue,
    validator: Option<Validator>,
}

impl fmt::Debug for EditableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditableValue")
            .field("raw", &self.raw)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

impl EditableValue {
    pub const fn new(raw: FieldValue) -> Self {
        Self {
            raw,
            validator: None,
        }
    }

    pub fn with_validator(
        raw: FieldValue,
        validator: impl Fn(&FieldValue) -> Validation + 'static,
    ) -> Self {
        Self {
            raw,
            validator: Some(Box::new(validator)),
        }
    }

    pub fn shared(self) -> SharedValue {
        Rc::new(RefCell::new(self))
    }

    pub fn value(&self) -> &FieldValue {
        &self.raw
    }

    pub fn validate(&self, candidate: &FieldValue) -> Validation {
        match &self.validator {
            Some(validator) => validator(candidate),
            None => Validation::Accept,
        }
    }

    /// Runs the validator and stores the accepted value. The change is tagged with
    /// `group` but not announced; see [`ValueOutcome::notify`].
    pub fn set_value(&mut self, candidate: FieldValue, group: Option<GroupId>) -> ValueOutcome {
        if candidate.is_non_finite() {
            tracing::debug!(?candidate, "declined non-finite number");
            return ValueOutcome::Malformed;
        }
        let accepted = match self.validate(&candidate) {
            Validation::Accept => candidate,
            Validation::Replace(replacement) if replacement.is_non_finite() => {
                tracing::warn!(?candidate, "validator replaced value with a non-finite number");
                return ValueOutcome::Malformed;
            }
            Validation::Replace(replacement) => replacement,
            Validation::Reject => {
                tracing::debug!(?candidate, "candidate value rejected by validator");
                return ValueOutcome::Rejected;
            }
        };
        self.apply(accepted, group)
    }

    /// Parses `text` against the current value's kind. Unparseable numbers are declined.
    pub fn set_text(&mut self, text: &str, group: Option<GroupId>) -> ValueOutcome {
        let candidate = match self.raw {
            FieldValue::Number(_) => match text.trim().parse::<f64>() {
                Ok(number) => FieldValue::Number(number),
                Err(_) => {
                    tracing::debug!(text, "declined malformed numeric input");
                    return ValueOutcome::Malformed;
                }
            },
            FieldValue::Text(_) => FieldValue::text(text),
        };
        self.set_value(candidate, group)
    }

    /// Writes back a value that was accepted earlier, skipping the validator.
    pub fn restore(&mut self, previous: FieldValue, group: Option<GroupId>) -> ValueOutcome {
        self.apply(previous, group)
    }

    fn apply(&mut self, accepted: FieldValue, group: Option<GroupId>) -> ValueOutcome {
        if accepted == self.raw {
            return ValueOutcome::Unchanged;
        }
        let previous = std::mem::replace(&mut self.raw, accepted);
        ValueOutcome::Changed {
            previous,
            current: self.raw.clone(),
            group,
        }
    }
}
