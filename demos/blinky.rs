// Copyright (c) 2018 The rust-gpio-cdev Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use gpio_sysfs::{LogicLevel, Pin, PinOptions, Sysfs};
use quicli::prelude::*;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::{Duration, Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct Cli {
    /// The GPIO number known by the kernel
    pin: u32,
    /// Period in milliseconds
    period_ms: u64,
    /// Duration over which to blink in milliseconds
    duration_ms: u64,
    /// Root of the sysfs GPIO tree
    #[structopt(long, default_value = "/sys/class/gpio", parse(from_os_str))]
    root: PathBuf,
    /// Treat the low electrical level as "on"
    #[structopt(long)]
    active_low: bool,
}

fn do_main(args: Cli) -> gpio_sysfs::Result<()> {
    // NOTE: the pin starts low, so no separate write is needed before
    // the first period
    let mut led = Pin::output_with(
        Sysfs::with_root(args.root),
        args.pin,
        false,
        PinOptions::default(),
    )?;
    if args.active_low {
        led.set_logic_level(LogicLevel::ActiveLow)?;
    }

    let duration = Duration::from_millis(args.duration_ms);
    let start_time = Instant::now();
    while start_time.elapsed() < duration {
        sleep(Duration::from_millis(args.period_ms));
        led.high()?;
        sleep(Duration::from_millis(args.period_ms));
        led.low()?;
    }

    led.cleanup()
}

fn main() -> CliResult {
    let args = Cli::from_args();
    do_main(args).or_else(|e| {
        error!("{:?}", e);
        Ok(())
    })
}
