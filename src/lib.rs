// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `gpio-sysfs` crate provides access to GPIO lines through the legacy
//! [sysfs interface](https://www.kernel.org/doc/Documentation/gpio/sysfs.txt)
//! under `/sys/class/gpio`, for kernels and boards where the character
//! device is not available.
//!
//! A line is requested by writing its number to `export`, after which the
//! kernel creates a `gpioN/` directory holding one small text file per
//! attribute (`direction`, `edge`, `active_low`, `value`). The [`sysfs`]
//! module wraps each of these files; [`Pin`] sequences them into a lifecycle
//! of export, configure, read or write, and unexport.
//!
//! # Examples
//!
//! Mirror an input line onto an output line:
//!
//! ```no_run
//! use gpio_sysfs::{Pin, Value};
//!
//! fn mirror_gpio(input: u32, output: u32) -> Result<(), gpio_sysfs::Error> {
//!     let mut input = Pin::new_input(input)?;
//!     let mut output = Pin::new_output(output, false)?;
//!     for _ in 0..100 {
//!         match input.read()? {
//!             Value::Active => output.high()?,
//!             Value::Inactive => output.low()?,
//!         }
//!     }
//!     input.cleanup()?;
//!     output.cleanup()
//! }
//!
//! # fn main() -> Result<(), gpio_sysfs::Error> {
//! #     mirror_gpio(17, 27)
//! # }
//! ```
//!
//! Working against a different control tree, with a shorter export wait:
//!
//! ```no_run
//! use std::time::Duration;
//! use gpio_sysfs::{LogicLevel, Pin, PinOptions, Sysfs};
//!
//! # fn main() -> Result<(), gpio_sysfs::Error> {
//! let files = Sysfs::with_root("/mnt/sys/class/gpio");
//! let options = PinOptions::new().with_export_timeout(Duration::from_millis(250));
//! let mut led = Pin::output_with(files, 4, false, options)?;
//! led.set_logic_level(LogicLevel::ActiveLow)?;
//! led.high()?;
//! # Ok(()) }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod errors;

pub mod files;

#[cfg(test)]
mod mock;

pub mod options;

pub mod pin;

pub mod sysfs;

pub use errors::{Error, ErrorKind, Result};
pub use files::{Access, ControlFiles, Sysfs};
pub use options::{Attribute, Direction, Edge, LogicLevel, Value};
pub use pin::{Pin, PinOptions};
