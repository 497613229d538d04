// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! In-memory stand-in for the kernel's GPIO control tree.
//!
//! Models enough of the kernel to drive the lifecycle: `export` creates the
//! per-pin files, a second export of the same pin fails with `EBUSY`,
//! `unexport` removes them, and `direction` writes of `low`/`high` seed the
//! value file.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::files::{Access, ControlFiles};

/// When an exported pin's `direction` file becomes writable.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Permission {
    Immediate,
    After(Duration),
    Never,
}

#[derive(Debug)]
struct State {
    files: HashMap<PathBuf, Vec<u8>>,
    exported: BTreeMap<u32, Instant>,
    permission: Permission,
    refuse_export: BTreeSet<u32>,
    writes: Vec<(PathBuf, Vec<u8>)>,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeKernel {
    state: Arc<Mutex<State>>,
}

impl FakeKernel {
    pub(crate) fn new() -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("export"), Vec::new());
        files.insert(PathBuf::from("unexport"), Vec::new());
        Self {
            state: Arc::new(Mutex::new(State {
                files,
                exported: BTreeMap::new(),
                permission: Permission::Immediate,
                refuse_export: BTreeSet::new(),
                writes: Vec::new(),
            })),
        }
    }

    pub(crate) fn with_permission(self, permission: Permission) -> Self {
        self.lock().permission = permission;
        self
    }

    /// Make exporting `pin` fail as if the line did not exist.
    pub(crate) fn refuse_export(&self, pin: u32) {
        self.lock().refuse_export.insert(pin);
    }

    pub(crate) fn is_exported(&self, pin: u32) -> bool {
        self.lock().exported.contains_key(&pin)
    }

    /// Contents of a control file, if it exists.
    pub(crate) fn contents(&self, path: &str) -> Option<String> {
        self.lock()
            .files
            .get(Path::new(path))
            .map(|c| String::from_utf8_lossy(c).into_owned())
    }

    pub(crate) fn set_contents(&self, path: &str, contents: &[u8]) {
        self.lock()
            .files
            .insert(PathBuf::from(path), contents.to_vec());
    }

    pub(crate) fn remove(&self, path: &str) {
        self.lock().files.remove(Path::new(path));
    }

    /// Every write seen so far, in order.
    pub(crate) fn writes(&self) -> Vec<(String, String)> {
        self.lock()
            .writes
            .iter()
            .map(|(p, c)| {
                (
                    p.display().to_string(),
                    String::from_utf8_lossy(c).into_owned(),
                )
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl State {
    fn apply_write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.writes.push((path.to_owned(), contents.to_vec()));

        let text = std::str::from_utf8(contents).map_err(|_| einval())?;
        match path.to_str() {
            Some("export") => {
                let pin: u32 = text.trim().parse().map_err(|_| einval())?;
                if self.refuse_export.contains(&pin) {
                    return Err(einval());
                }
                if self.exported.contains_key(&pin) {
                    return Err(io::Error::from_raw_os_error(nix::libc::EBUSY));
                }
                self.exported.insert(pin, Instant::now());
                for (attr, init) in [
                    ("direction", "in"),
                    ("edge", "none"),
                    ("active_low", "0"),
                    ("value", "0"),
                ] {
                    self.files
                        .insert(pin_path(pin, attr), init.as_bytes().to_vec());
                }
                Ok(())
            }
            Some("unexport") => {
                let pin: u32 = text.trim().parse().map_err(|_| einval())?;
                if self.exported.remove(&pin).is_none() {
                    return Err(einval());
                }
                let prefix = PathBuf::from(format!("gpio{pin}"));
                self.files.retain(|p, _| !p.starts_with(&prefix));
                Ok(())
            }
            _ => {
                let file = self
                    .files
                    .get_mut(path)
                    .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
                *file = contents.to_vec();

                if path.file_name().and_then(|f| f.to_str()) == Some("direction") {
                    let seed = match text {
                        "low" => Some(b"0"),
                        "high" => Some(b"1"),
                        _ => None,
                    };
                    if let (Some(seed), Some(parent)) = (seed, path.parent()) {
                        self.files.insert(parent.join("value"), seed.to_vec());
                    }
                }
                Ok(())
            }
        }
    }
}

impl ControlFiles for FakeKernel {
    type Handle = FakeFile;

    fn open(&self, path: &Path, access: Access) -> io::Result<FakeFile> {
        let mut state = self.lock();
        if !state.files.contains_key(path) {
            return Err(io::ErrorKind::NotFound.into());
        }
        if access != Access::Read && !writable(&state, path) {
            return Err(io::ErrorKind::PermissionDenied.into());
        }
        if access == Access::Write {
            if let Some(file) = state.files.get_mut(path) {
                if !is_command(path) {
                    file.clear();
                }
            }
        }
        Ok(FakeFile {
            kernel: self.clone(),
            path: path.to_owned(),
            access,
            pos: 0,
        })
    }

    fn is_writable(&self, path: &Path) -> bool {
        let state = self.lock();
        state.files.contains_key(path) && writable(&state, path)
    }
}

fn writable(state: &State, path: &Path) -> bool {
    if is_command(path) {
        return true;
    }
    let pin = path
        .iter()
        .next()
        .and_then(|c| c.to_str())
        .and_then(|c| c.strip_prefix("gpio"))
        .and_then(|n| n.parse::<u32>().ok());
    let Some(exported_at) = pin.and_then(|pin| state.exported.get(&pin)) else {
        return false;
    };
    match state.permission {
        Permission::Immediate => true,
        Permission::After(delay) => exported_at.elapsed() >= delay,
        Permission::Never => false,
    }
}

fn is_command(path: &Path) -> bool {
    path == Path::new("export") || path == Path::new("unexport")
}

fn pin_path(pin: u32, attr: &str) -> PathBuf {
    PathBuf::from(format!("gpio{pin}/{attr}"))
}

fn einval() -> io::Error {
    io::Error::from_raw_os_error(nix::libc::EINVAL)
}

/// An open control file. Each write replaces the whole file, as the kernel
/// treats every write as a complete value regardless of offset.
#[derive(Debug)]
pub(crate) struct FakeFile {
    kernel: FakeKernel,
    path: PathBuf,
    access: Access,
    pos: u64,
}

impl Read for FakeFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.access == Access::Write {
            return Err(io::Error::from_raw_os_error(nix::libc::EBADF));
        }
        let state = self.kernel.lock();
        let file = state
            .files
            .get(&self.path)
            .ok_or_else(|| io::Error::from_raw_os_error(nix::libc::ENODEV))?;
        let start = (self.pos as usize).min(file.len());
        let n = (&file[start..]).read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for FakeFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.access == Access::Read {
            return Err(io::Error::from_raw_os_error(nix::libc::EBADF));
        }
        self.kernel.lock().apply_write(&self.path, buf)?;
        self.pos += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for FakeFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.pos = match pos {
            SeekFrom::Start(p) => p,
            SeekFrom::Current(off) => self.pos.saturating_add_signed(off),
            SeekFrom::End(_) => return Err(io::ErrorKind::Unsupported.into()),
        };
        Ok(self.pos)
    }
}
