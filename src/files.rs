// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Access to the GPIO control tree.
//!
//! The tree under `/sys/class/gpio` is shared, kernel-owned state. Everything
//! in this crate reaches it through [`ControlFiles`] so that the same code
//! can run against a different root or a fake kernel.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

use nix::unistd::{access, AccessFlags};

/// Default mount point of the sysfs GPIO class.
pub const SYSFS_GPIO_PATH: &str = "/sys/class/gpio";

/// How a control file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read only, for sensing an input's value.
    Read,
    /// Write only and truncating, for writing a single token.
    Write,
    /// Read and write, for driving an output's value.
    ReadWrite,
}

/// A provider of the GPIO control files.
///
/// Paths handed to the provider are relative to the control tree root, e.g.
/// `export` or `gpio17/direction`.
pub trait ControlFiles: Clone {
    type Handle: Read + Write + Seek;

    /// Open the control file at `path`.
    fn open(&self, path: &Path, access: Access) -> io::Result<Self::Handle>;

    /// Whether the calling process may currently write to `path`.
    fn is_writable(&self, path: &Path) -> bool;
}

/// The kernel's control tree, by default at [`SYSFS_GPIO_PATH`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sysfs {
    root: PathBuf,
}

impl Sysfs {
    pub fn new() -> Self {
        Self::with_root(SYSFS_GPIO_PATH)
    }

    /// Use the control tree mounted at `root` instead of the default.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for Sysfs {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlFiles for Sysfs {
    type Handle = File;

    fn open(&self, path: &Path, access: Access) -> io::Result<File> {
        let mut options = OpenOptions::new();
        match access {
            Access::Read => options.read(true),
            // sysfs ignores O_TRUNC; regular files need it to hold a single token
            Access::Write => options.write(true).truncate(true),
            Access::ReadWrite => options.read(true).write(true),
        };
        options.open(self.root.join(path))
    }

    fn is_writable(&self, path: &Path) -> bool {
        access(&self.root.join(path), AccessFlags::W_OK).is_ok()
    }
}
