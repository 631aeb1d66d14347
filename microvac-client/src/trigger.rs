//! Triggers and the control panels they are bound to
//!
//! A trigger is a named control on a panel mapped one-to-one to a remote
//! command. The Microvac panel has eight: a five-button drive pad and three
//! expression buttons.
//!
//! ```text
//!             [button-fwd]
//! [button-tle] [button-sto] [button-tri]
//!             [button-bak]
//!
//! [button-exp1] [button-exp2] [button-exp3]
//! ```
//!
//! The controller does not own the panel. It asks the panel, through
//! `ControlPanel`, whether each control exists, and refuses to start if any
//! is missing.

use microvac_core::{Command, Error, Result};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// One of the eight panel triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Forward,
    TurnLeft,
    Stop,
    TurnRight,
    Backward,
    Expression1,
    Expression2,
    Expression3,
}

impl Trigger {
    /// Every trigger, in panel order
    pub const ALL: [Trigger; 8] = [
        Trigger::Forward,
        Trigger::TurnLeft,
        Trigger::Stop,
        Trigger::TurnRight,
        Trigger::Backward,
        Trigger::Expression1,
        Trigger::Expression2,
        Trigger::Expression3,
    ];

    /// Trigger name as used by the panel and in logs
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::Forward => "forward",
            Trigger::TurnLeft => "turnLeft",
            Trigger::Stop => "stop",
            Trigger::TurnRight => "turnRight",
            Trigger::Backward => "backward",
            Trigger::Expression1 => "expression1",
            Trigger::Expression2 => "expression2",
            Trigger::Expression3 => "expression3",
        }
    }

    /// Identifier of the panel control this trigger binds to
    pub fn control_id(&self) -> &'static str {
        match self {
            Trigger::Forward => "button-fwd",
            Trigger::TurnLeft => "button-tle",
            Trigger::Stop => "button-sto",
            Trigger::TurnRight => "button-tri",
            Trigger::Backward => "button-bak",
            Trigger::Expression1 => "button-exp1",
            Trigger::Expression2 => "button-exp2",
            Trigger::Expression3 => "button-exp3",
        }
    }

    /// Keyboard key for the terminal panel
    pub fn key(&self) -> char {
        match self {
            Trigger::Forward => 'w',
            Trigger::TurnLeft => 'a',
            Trigger::Stop => 's',
            Trigger::TurnRight => 'd',
            Trigger::Backward => 'x',
            Trigger::Expression1 => '1',
            Trigger::Expression2 => '2',
            Trigger::Expression3 => '3',
        }
    }

    /// The fixed command this trigger sends
    pub fn command(&self) -> Command {
        match self {
            Trigger::Forward => Command::forwards(),
            Trigger::TurnLeft => Command::turn_left(),
            Trigger::Stop => Command::Stop,
            Trigger::TurnRight => Command::turn_right(),
            Trigger::Backward => Command::backwards(),
            Trigger::Expression1 => Command::expression("1"),
            Trigger::Expression2 => Command::expression("2"),
            Trigger::Expression3 => Command::expression("3"),
        }
    }

    pub fn from_control_id(id: &str) -> Option<Trigger> {
        Self::ALL.into_iter().find(|t| t.control_id() == id)
    }

    pub fn from_key(key: char) -> Option<Trigger> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Trigger {
    type Err = Error;

    /// Accepts a trigger name, a control id, or a single key
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(trigger) = Trigger::from_key(c) {
                return Ok(trigger);
            }
        }
        Trigger::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .or_else(|| Trigger::from_control_id(s))
            .ok_or_else(|| Error::UnknownTrigger(s.to_string()))
    }
}

/// A UI surface exposing named, clickable controls
pub trait ControlPanel {
    /// Whether a control with this identifier exists
    fn has_control(&self, id: &str) -> bool;
}

/// A panel described by a fixed set of control identifiers
#[derive(Debug, Clone, Default)]
pub struct StaticPanel {
    controls: HashSet<String>,
}

impl StaticPanel {
    pub fn new<I, S>(controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            controls: controls.into_iter().map(Into::into).collect(),
        }
    }

    /// The standard Microvac panel with all eight controls
    pub fn microvac() -> Self {
        Self::new(Trigger::ALL.iter().map(|t| t.control_id()))
    }

    /// Drop a control, e.g. to model a page that failed to render one
    pub fn without(mut self, id: &str) -> Self {
        self.controls.remove(id);
        self
    }
}

impl ControlPanel for StaticPanel {
    fn has_control(&self, id: &str) -> bool {
        self.controls.contains(id)
    }
}

/// Resolve every trigger against a panel, keyed by control id
///
/// Fails on the first missing control; no partial binding is returned.
pub(crate) fn bind_triggers<P: ControlPanel + ?Sized>(panel: &P) -> Result<HashMap<String, Trigger>> {
    Trigger::ALL
        .into_iter()
        .map(|trigger| {
            if panel.has_control(trigger.control_id()) {
                Ok((trigger.control_id().to_string(), trigger))
            } else {
                Err(Error::MissingControl(trigger.control_id().to_string()))
            }
        })
        .collect()
}
