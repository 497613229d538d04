// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The fixed token vocabulary of the sysfs control files.
//!
//! Every setting the kernel accepts is one of a handful of short ASCII
//! words; each enum here maps one-to-one onto the legal tokens of a single
//! control file and nothing else.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, ErrorKind};

/// Whether a pin senses or drives its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Token written to the `direction` file.
    ///
    /// Output takes its initial level with it, `low` or `high`, so the line
    /// never floats between switching direction and the first write.
    pub(crate) const fn token(self, initial: Value) -> &'static str {
        match (self, initial) {
            (Direction::Input, _) => "in",
            (Direction::Output, Value::Inactive) => "low",
            (Direction::Output, Value::Active) => "high",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::Input),
            "out" | "low" | "high" => Ok(Direction::Output),
            other => Err(invalid(format!("unknown direction '{other}'"))),
        }
    }
}

/// Which transitions of an input line the kernel reports as events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Edge {
    #[default]
    None,
    Rising,
    Falling,
    Both,
}

impl Edge {
    pub const fn token(self) -> &'static str {
        match self {
            Edge::None => "none",
            Edge::Rising => "rising",
            Edge::Falling => "falling",
            Edge::Both => "both",
        }
    }
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Edge::None),
            "rising" => Ok(Edge::Rising),
            "falling" => Ok(Edge::Falling),
            "both" => Ok(Edge::Both),
            other => Err(invalid(format!("unknown edge '{other}'"))),
        }
    }
}

/// Polarity of a pin: which electrical level reads and writes as logic 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LogicLevel {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl LogicLevel {
    /// Token written to the `active_low` file.
    pub const fn token(self) -> &'static str {
        match self {
            LogicLevel::ActiveHigh => "0",
            LogicLevel::ActiveLow => "1",
        }
    }
}

impl FromStr for LogicLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(LogicLevel::ActiveHigh),
            "1" => Ok(LogicLevel::ActiveLow),
            other => Err(invalid(format!("unknown logic level '{other}'"))),
        }
    }
}

/// Logical value of a pin, after the polarity set by [`LogicLevel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Value {
    #[default]
    Inactive,
    Active,
}

impl Value {
    pub const fn new(is_active: bool) -> Self {
        if is_active {
            Self::Active
        } else {
            Self::Inactive
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self, Value::Active)
    }

    /// The raw digit as stored in the `value` file.
    pub const fn as_u8(self) -> u8 {
        match self {
            Value::Inactive => 0,
            Value::Active => 1,
        }
    }
}

impl From<bool> for Value {
    fn from(is_active: bool) -> Self {
        Value::new(is_active)
    }
}

impl From<Value> for u8 {
    fn from(value: Value) -> Self {
        value.as_u8()
    }
}

/// The per-pin control files under `gpioN/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Direction,
    Edge,
    ActiveLow,
    Value,
}

impl Attribute {
    pub const fn file_name(self) -> &'static str {
        match self {
            Attribute::Direction => "direction",
            Attribute::Edge => "edge",
            Attribute::ActiveLow => "active_low",
            Attribute::Value => "value",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

fn invalid(msg: String) -> Error {
    ErrorKind::InvalidConfiguration(msg).into()
}
