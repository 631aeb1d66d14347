//! Catalogue of the remote methods the Microvac bridge exposes
//!
//! Each `Command` knows its JSON-RPC method name and its positional
//! parameters. The bridge forwards these to the robot as colon-separated
//! command codes (`FWD`, `EXP:2`, `BUZ:440:500`, ...), so parameter order and
//! primitive types matter more than names.
//!
//! # Examples
//!
//! ```rust
//! use microvac_core::{Command, MotionTime};
//! use serde_json::json;
//!
//! assert_eq!(Command::forwards().method(), "forwards");
//! assert!(Command::forwards().params().is_empty());
//!
//! let timed = Command::Forwards { time: Some(MotionTime::millis(500)) };
//! assert_eq!(timed.params(), vec![json!(500), json!("ms")]);
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Unit for a timed motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Seconds, sent as `"s"`
    #[serde(rename = "s")]
    Seconds,
    /// Milliseconds, sent as `"ms"`
    #[serde(rename = "ms")]
    Millis,
}

impl TimeUnit {
    /// The unit token the bridge expects
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
        }
    }
}

/// How long a motion lasts before the robot stops by itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionTime {
    pub amount: u32,
    pub unit: TimeUnit,
}

impl MotionTime {
    pub fn seconds(amount: u32) -> Self {
        Self {
            amount,
            unit: TimeUnit::Seconds,
        }
    }

    pub fn millis(amount: u32) -> Self {
        Self {
            amount,
            unit: TimeUnit::Millis,
        }
    }
}

/// Unit for a rotation angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

/// A remote command understood by the Microvac bridge
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Drive forwards, until stopped or for the given time
    Forwards { time: Option<MotionTime> },
    /// Drive backwards, until stopped or for the given time
    Backwards { time: Option<MotionTime> },
    /// Spin left, until stopped or for the given time
    TurnLeft { time: Option<MotionTime> },
    /// Spin right, until stopped or for the given time
    TurnRight { time: Option<MotionTime> },
    /// Stop all motion and clear the display
    Stop,
    /// Show a preset expression on the LED matrix
    DisplayExpression(String),
    /// Sound the buzzer
    Beep { frequency: u32, millis: u32 },
    /// Rotate to an absolute heading
    TurnTo { angle: f64, unit: AngleUnit },
    /// Rotate by a relative angle
    Turn { angle: f64, unit: AngleUnit },
    /// Drive forwards a number of wheel steps
    ForwardsTo(u32),
    /// Drive backwards a number of wheel steps
    BackwardsTo(u32),
    /// Make the bridge pause before answering
    Wait(f64),
    /// Read the ultrasound distance sensor
    GetDistance,
}

impl Command {
    pub fn forwards() -> Self {
        Command::Forwards { time: None }
    }

    pub fn backwards() -> Self {
        Command::Backwards { time: None }
    }

    pub fn turn_left() -> Self {
        Command::TurnLeft { time: None }
    }

    pub fn turn_right() -> Self {
        Command::TurnRight { time: None }
    }

    pub fn expression(id: impl Into<String>) -> Self {
        Command::DisplayExpression(id.into())
    }

    /// JSON-RPC method name
    pub fn method(&self) -> &'static str {
        match self {
            Command::Forwards { .. } => "forwards",
            Command::Backwards { .. } => "backwards",
            Command::TurnLeft { .. } => "turnLeft",
            Command::TurnRight { .. } => "turnRight",
            Command::Stop => "stop",
            Command::DisplayExpression(_) => "displayExpression",
            Command::Beep { .. } => "beep",
            Command::TurnTo { .. } => "turnTo",
            Command::Turn { .. } => "turn",
            Command::ForwardsTo(_) => "forwardsTo",
            Command::BackwardsTo(_) => "backwardsTo",
            Command::Wait(_) => "wait",
            Command::GetDistance => "getDistance",
        }
    }

    /// Positional parameters, in the order the bridge reads them
    ///
    /// A zero-length motion time is sent as no params, which the bridge
    /// treats as "until stopped".
    pub fn params(&self) -> Vec<Value> {
        match self {
            Command::Forwards { time }
            | Command::Backwards { time }
            | Command::TurnLeft { time }
            | Command::TurnRight { time } => match time {
                Some(t) if t.amount > 0 => vec![json!(t.amount), json!(t.unit.as_str())],
                _ => Vec::new(),
            },
            Command::Stop | Command::GetDistance => Vec::new(),
            Command::DisplayExpression(id) => vec![json!(id)],
            Command::Beep { frequency, millis } => vec![json!(frequency), json!(millis)],
            Command::TurnTo { angle, unit } | Command::Turn { angle, unit } => {
                vec![json!(angle), json!(*unit == AngleUnit::Degrees)]
            }
            Command::ForwardsTo(steps) | Command::BackwardsTo(steps) => vec![json!(steps)],
            Command::Wait(seconds) => vec![json!(seconds)],
        }
    }

    /// Reject parameters JSON cannot carry
    ///
    /// `serde_json` writes NaN and the infinities as `null`, which the bridge
    /// would read as a missing argument.
    pub fn validate(&self) -> Result<()> {
        let value = match self {
            Command::TurnTo { angle, .. } | Command::Turn { angle, .. } => *angle,
            Command::Wait(seconds) => *seconds,
            _ => return Ok(()),
        };
        if value.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidParams(format!("{}: {} is not a finite number", self.method(), value)))
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.method(), Value::Array(self.params()))
    }
}
