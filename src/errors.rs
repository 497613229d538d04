// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IOError;
use std::time::Duration;

use crate::options::{Attribute, Direction};

pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by every fallible operation in this crate.
///
/// The [`ErrorKind`] names the failed step along with the pin and, where
/// there is one, the OS error underneath.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("failed to export gpio {pin}")]
    Export { pin: u32, source: IOError },
    #[error("exporting gpio {pin} took more than {elapsed:?}")]
    ExportTimeout { pin: u32, elapsed: Duration },
    #[error("failed to unexport gpio {pin}")]
    Unexport { pin: u32, source: IOError },
    #[error("failed to open gpio {pin} {attribute} file")]
    Open {
        pin: u32,
        attribute: Attribute,
        source: IOError,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to read gpio {pin} value")]
    Read { pin: u32, source: IOError },
    #[error("failed to write gpio {pin} {attribute} file")]
    Write {
        pin: u32,
        attribute: Attribute,
        source: IOError,
    },
    #[error("read inconsistent value from gpio {pin} value file: {byte:#04x}")]
    UnexpectedValueEncoding { pin: u32, byte: u8 },
    #[error("invalid output value {value} for gpio {pin}")]
    InvalidValue { pin: u32, value: u8 },
    #[error("gpio {pin} is configured for {direction}")]
    WrongDirection { pin: u32, direction: Direction },
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.kind.source()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind }
    }
}
