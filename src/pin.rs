// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;
use std::io;
use std::time::Duration;

use crate::errors::{Error, ErrorKind, Result};
use crate::files::{ControlFiles, Sysfs};
use crate::options::{Attribute, Direction, Edge, LogicLevel, Value};
use crate::sysfs::{self, ValueHandle, DEFAULT_EXPORT_TIMEOUT};

/// Settings used while constructing a [`Pin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinOptions {
    /// Upper bound on the wait for an exported pin to become configurable.
    pub export_timeout: Duration,
}

impl PinOptions {
    pub const fn new() -> Self {
        Self {
            export_timeout: DEFAULT_EXPORT_TIMEOUT,
        }
    }

    pub const fn with_export_timeout(self, export_timeout: Duration) -> Self {
        Self { export_timeout }
    }
}

impl Default for PinOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A single exported GPIO, configured either as an input or as an output.
///
/// A `Pin` owns the open value file of its line. The direction is fixed at
/// construction; to change it, [`cleanup`](Pin::cleanup) the pin and
/// construct a new one.
///
/// Dropping a `Pin` closes its value file but leaves the line exported.
/// Only [`cleanup`](Pin::cleanup) gives it back to the kernel.
///
/// A `Pin` must not be shared between threads without external locking, but
/// pins for different lines are independent.
pub struct Pin<F: ControlFiles = Sysfs> {
    number: u32,
    direction: Direction,
    files: F,
    handle: Option<ValueHandle<F::Handle>>,
}

impl<F: ControlFiles> fmt::Debug for Pin<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pin")
            .field("number", &self.number)
            .field("direction", &self.direction)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Pin<Sysfs> {
    /// Export `number` from `/sys/class/gpio` and open it for reading.
    ///
    /// The number is the one known by the kernel, not a header pin.
    pub fn new_input(number: u32) -> Result<Self> {
        Self::input_with(Sysfs::new(), number, PinOptions::default())
    }

    /// Export `number` from `/sys/class/gpio` and open it for writing,
    /// driven high from the start if `init_high` is set and low otherwise.
    pub fn new_output(number: u32, init_high: bool) -> Result<Self> {
        Self::output_with(Sysfs::new(), number, init_high, PinOptions::default())
    }
}

impl<F: ControlFiles> Pin<F> {
    pub fn input_with(files: F, number: u32, options: PinOptions) -> Result<Self> {
        Self::open(files, number, Direction::Input, 0, options)
    }

    pub fn output_with(files: F, number: u32, init_high: bool, options: PinOptions) -> Result<Self> {
        Self::open(
            files,
            number,
            Direction::Output,
            Value::new(init_high).as_u8(),
            options,
        )
    }

    fn open(
        files: F,
        number: u32,
        direction: Direction,
        initial: u8,
        options: PinOptions,
    ) -> Result<Self> {
        sysfs::export(&files, number)?;

        let configured = sysfs::wait_until_configurable(&files, number, options.export_timeout)
            .and_then(|_| sysfs::set_direction(&files, number, direction, initial))
            .and_then(|_| {
                sysfs::open_value_handle(&files, number, direction == Direction::Output)
            });

        match configured {
            Ok(handle) => {
                log::debug!("gpio {} ready as {}", number, direction);
                Ok(Self {
                    number,
                    direction,
                    files,
                    handle: Some(handle),
                })
            }
            Err(err) => {
                // the line is ours after a successful export, give it back
                if let Err(rollback) = sysfs::unexport(&files, number) {
                    log::debug!("rollback of gpio {} failed: {}", number, rollback);
                }
                Err(err)
            }
        }
    }

    /// The kernel's number for this line.
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the value file is still open.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Release the value file without unexporting the line.
    ///
    /// Closing an already closed pin does nothing.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            log::debug!("closed gpio {}", self.number);
        }
    }

    /// Close the pin and return the line to the kernel.
    pub fn cleanup(mut self) -> Result<()> {
        self.close();
        sysfs::unexport(&self.files, self.number)
    }

    /// Read the value of an input pin, as seen through its logic level.
    pub fn read(&mut self) -> Result<Value> {
        self.expect_direction(Direction::Input)?;
        let pin = self.number;
        let handle = self.handle.as_mut().ok_or_else(|| ErrorKind::Read {
            pin,
            source: closed(),
        })?;
        Ok(Value::new(handle.read()? == 1))
    }

    /// Drive an output pin to logic high.
    pub fn high(&mut self) -> Result<()> {
        self.set_value(Value::Active)
    }

    /// Drive an output pin to logic low.
    pub fn low(&mut self) -> Result<()> {
        self.set_value(Value::Inactive)
    }

    pub fn set_value(&mut self, value: Value) -> Result<()> {
        self.expect_direction(Direction::Output)?;
        let pin = self.number;
        let handle = self.handle.as_mut().ok_or_else(|| ErrorKind::Write {
            pin,
            attribute: Attribute::Value,
            source: closed(),
        })?;
        handle.write(value.as_u8())
    }

    /// Set whether logic 1 means the high (default) or the low electrical
    /// level. Affects every later read and write, whatever the direction.
    pub fn set_logic_level(&self, level: LogicLevel) -> Result<()> {
        sysfs::set_logic_level(&self.files, self.number, level)
    }

    /// Select which transitions of an input pin the kernel reports as events.
    pub fn set_edge_trigger(&self, edge: Edge) -> Result<()> {
        self.expect_direction(Direction::Input)?;
        sysfs::set_edge_trigger(&self.files, self.number, edge)
    }

    fn expect_direction(&self, expected: Direction) -> Result<()> {
        if self.direction == expected {
            Ok(())
        } else {
            Err(Error::from(ErrorKind::WrongDirection {
                pin: self.number,
                direction: self.direction,
            }))
        }
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "pin is closed")
}
