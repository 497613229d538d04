// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The attribute protocol: stateless reads and writes of the per-pin
//! control files.
//!
//! Each function performs a single open-write-close (or, for the value file,
//! an open) against one control file. None of them keep state between calls;
//! [`Pin`](crate::Pin) sequences them into a safe lifecycle.
//!
//! Exporting is asynchronous from the point of view of the caller. The kernel
//! creates `gpioN/` right away, but its permissions are fixed up afterwards
//! by udev or a similar daemon, so [`export`] is paired with
//! [`wait_until_configurable`] which polls until `direction` can be written.

use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::errors::{ErrorKind, Result};
use crate::files::{Access, ControlFiles};
use crate::options::{Attribute, Direction, Edge, LogicLevel, Value};

/// Delay between two probes of the `direction` file after export.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long an exported pin may take to become configurable.
pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(1);

pub(crate) fn attribute_path(pin: u32, attribute: Attribute) -> PathBuf {
    PathBuf::from(format!("gpio{}/{}", pin, attribute.file_name()))
}

/// Ask the kernel to hand `pin` over to userspace.
///
/// Succeeding here does not mean the per-pin files can be used yet, see
/// [`wait_until_configurable`].
pub fn export<F: ControlFiles>(files: &F, pin: u32) -> Result<()> {
    write_command(files, "export", pin)
        .map_err(|source| ErrorKind::Export { pin, source })?;
    log::debug!("exported gpio {}", pin);
    Ok(())
}

/// Return `pin` to the kernel.
///
/// Does not wait for `gpioN/` to disappear.
pub fn unexport<F: ControlFiles>(files: &F, pin: u32) -> Result<()> {
    write_command(files, "unexport", pin)
        .map_err(|source| ErrorKind::Unexport { pin, source })?;
    log::debug!("unexported gpio {}", pin);
    Ok(())
}

fn write_command<F: ControlFiles>(files: &F, command: &str, pin: u32) -> std::io::Result<()> {
    let mut file = files.open(Path::new(command), Access::Write)?;
    file.write_all(pin.to_string().as_bytes())
}

/// Block until the `direction` file of `pin` is writable by this process,
/// probing every [`POLL_INTERVAL`].
///
/// Fails with [`ErrorKind::ExportTimeout`] once `timeout` has elapsed.
pub fn wait_until_configurable<F: ControlFiles>(
    files: &F,
    pin: u32,
    timeout: Duration,
) -> Result<()> {
    let path = attribute_path(pin, Attribute::Direction);
    let start = Instant::now();
    loop {
        if files.is_writable(&path) {
            log::trace!("gpio {} configurable after {:?}", pin, start.elapsed());
            return Ok(());
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(ErrorKind::ExportTimeout { pin, elapsed }.into());
        }
        sleep(POLL_INTERVAL.min(timeout - elapsed));
    }
}

/// Configure the direction of `pin`.
///
/// For outputs, `initial` is written together with the direction (`low` or
/// `high`) so the line is driven to a known level from the start. Inputs
/// only accept an `initial` of 0.
pub fn set_direction<F: ControlFiles>(
    files: &F,
    pin: u32,
    direction: Direction,
    initial: u8,
) -> Result<()> {
    let initial = match (direction, initial) {
        (Direction::Input, 0) => Value::Inactive,
        (Direction::Output, 0) => Value::Inactive,
        (Direction::Output, 1) => Value::Active,
        (direction, initial) => {
            return Err(ErrorKind::InvalidConfiguration(format!(
                "cannot set gpio {pin} to {direction} with initial value {initial}"
            ))
            .into())
        }
    };
    write_attribute(files, pin, Attribute::Direction, direction.token(initial))
}

/// Select which transitions of `pin` the kernel reports.
pub fn set_edge_trigger<F: ControlFiles>(files: &F, pin: u32, edge: Edge) -> Result<()> {
    write_attribute(files, pin, Attribute::Edge, edge.token())
}

/// Set the polarity of `pin`. With [`LogicLevel::ActiveLow`] the kernel
/// inverts every subsequent read and write of the value file.
pub fn set_logic_level<F: ControlFiles>(files: &F, pin: u32, level: LogicLevel) -> Result<()> {
    write_attribute(files, pin, Attribute::ActiveLow, level.token())
}

fn write_attribute<F: ControlFiles>(
    files: &F,
    pin: u32,
    attribute: Attribute,
    token: &str,
) -> Result<()> {
    let mut file = files
        .open(&attribute_path(pin, attribute), Access::Write)
        .map_err(|source| ErrorKind::Open {
            pin,
            attribute,
            source,
        })?;
    file.write_all(token.as_bytes())
        .map_err(|source| ErrorKind::Write {
            pin,
            attribute,
            source,
        })?;
    log::trace!("gpio {} {} <- {}", pin, attribute, token);
    Ok(())
}

/// Open the value file of `pin`, read-write if `writable` and read-only
/// otherwise.
pub fn open_value_handle<F: ControlFiles>(
    files: &F,
    pin: u32,
    writable: bool,
) -> Result<ValueHandle<F::Handle>> {
    let access = if writable {
        Access::ReadWrite
    } else {
        Access::Read
    };
    let file = files
        .open(&attribute_path(pin, Attribute::Value), access)
        .map_err(|source| ErrorKind::Open {
            pin,
            attribute: Attribute::Value,
            source,
        })?;
    Ok(ValueHandle { pin, file })
}

/// An open `value` file.
#[derive(Debug)]
pub struct ValueHandle<H> {
    pin: u32,
    file: H,
}

impl<H: Read + Write + Seek> ValueHandle<H> {
    pub fn pin(&self) -> u32 {
        self.pin
    }

    /// Read the current value as the digit 0 or 1.
    ///
    /// The file is rewound first; sysfs only produces fresh content for a
    /// read starting at offset 0.
    pub fn read(&mut self) -> Result<u8> {
        let pin = self.pin;
        let mut buf = [0u8; 1];
        self.file
            .rewind()
            .and_then(|_| self.file.read_exact(&mut buf))
            .map_err(|source| ErrorKind::Read { pin, source })?;

        match buf[0] {
            b'0' => Ok(0),
            b'1' => Ok(1),
            byte => Err(ErrorKind::UnexpectedValueEncoding { pin, byte }.into()),
        }
    }

    /// Write the digit 0 or 1.
    pub fn write(&mut self, value: u8) -> Result<()> {
        let pin = self.pin;
        let digit: &[u8] = match value {
            0 => b"0",
            1 => b"1",
            value => return Err(ErrorKind::InvalidValue { pin, value }.into()),
        };
        self.file
            .rewind()
            .and_then(|_| self.file.write_all(digit))
            .map_err(|source| ErrorKind::Write {
                pin,
                attribute: Attribute::Value,
                source,
            })?;
        Ok(())
    }
}
