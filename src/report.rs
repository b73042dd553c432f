//! The capability report: platforms, then each platform's attributes and
//! devices, written as text.

use std::io::Write;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::platform::{platforms, Platform, PlatformAttribute};
use crate::runtime::Runtime;

/// What the reporter does when a single query fails.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure.
    #[default]
    Abort,
    /// Print a diagnostic, leave the value out and keep going. Platform
    /// enumeration failures still stop the report.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<FailurePolicy, ()> {
        if s.eq_ignore_ascii_case("abort") {
            Ok(FailurePolicy::Abort)
        } else if s.eq_ignore_ascii_case("skip") {
            Ok(FailurePolicy::Skip)
        } else {
            Err(())
        }
    }
}

/// Counts from a finished report.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub platforms: usize,
    pub devices: usize,
    /// Queries that failed and were left out under [`FailurePolicy::Skip`].
    pub skipped: usize,
}

/// Walks every platform and device of a runtime and prints what it finds.
pub struct Reporter<'r, R: Runtime + ?Sized> {
    runtime: &'r R,
    policy: FailurePolicy,
}

impl<'r, R: Runtime + ?Sized> Reporter<'r, R> {
    pub fn new(runtime: &'r R) -> Reporter<'r, R> {
        Reporter {
            runtime,
            policy: FailurePolicy::default(),
        }
    }

    pub fn policy(mut self, policy: FailurePolicy) -> Reporter<'r, R> {
        self.policy = policy;
        self
    }

    /// Writes the report to `out`.
    ///
    /// Under [`FailurePolicy::Skip`] the diagnostics of skipped queries go to
    /// `diag`; under [`FailurePolicy::Abort`] the first failure is returned
    /// and nothing is written to `diag`.
    pub fn report<W, E>(&self, out: &mut W, diag: &mut E) -> Result<Summary>
    where
        W: Write + ?Sized,
        E: Write + ?Sized,
    {
        let platforms = platforms(self.runtime)?;
        writeln!(out, "Number of platforms: {}", platforms.len())?;

        let mut pass = Pass {
            policy: self.policy,
            diag,
            summary: Summary {
                platforms: platforms.len(),
                ..Summary::default()
            },
        };

        for (k, platform) in platforms.iter().enumerate() {
            pass.platform(k, platform, out)?;
        }

        Ok(pass.summary)
    }
}

struct Pass<'d, E: Write + ?Sized> {
    policy: FailurePolicy,
    diag: &'d mut E,
    summary: Summary,
}

impl<'d, E: Write + ?Sized> Pass<'d, E> {
    /// Applies the failure policy to one query's result.
    fn attempt<T>(&mut self, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.policy == FailurePolicy::Skip && err.is_query() => {
                warn!("Skipping: {}", err);
                writeln!(self.diag, "{}", err)?;
                self.summary.skipped += 1;
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn platform<R, W>(&mut self, k: usize, platform: &Platform<'_, R>, out: &mut W) -> Result<()>
    where
        R: Runtime + ?Sized,
        W: Write + ?Sized,
    {
        writeln!(out, "Platform <{}>", k)?;

        for attribute in PlatformAttribute::ALL {
            if let Some(value) = self.attempt(platform.info(attribute))? {
                writeln!(out, "Platform {} {}: {}", k, attribute.label(), value)?;
            }
        }

        let devices = match self.attempt(platform.get_devices())? {
            Some(devices) => devices,
            None => return Ok(()),
        };
        writeln!(out, "Number of devices: {}", devices.len())?;
        self.summary.devices += devices.len();

        for device in &devices {
            if let Some(name) = self.attempt(device.name())? {
                writeln!(out, "CL_DEVICE_NAME: {}", name)?;
            }
            if let Some(bits) = self.attempt(device.address_bits())? {
                writeln!(out, "CL_DEVICE_ADDRESS_BITS: {}", bits)?;
            }
            if let Some(extensions) = self.attempt(device.extensions())? {
                writeln!(out, "CL_DEVICE_EXTENSIONS: {}", extensions)?;
            }
            writeln!(out)?;
        }

        Ok(())
    }
}

/// Runs a full report and turns its outcome into a process exit code.
///
/// Returns 0 when every query succeeded. Otherwise writes the failure as one
/// line to `diag` and returns 1; a `Skip` run that left anything out also
/// returns 1.
pub fn run<R, W, E>(runtime: &R, policy: FailurePolicy, out: &mut W, diag: &mut E) -> i32
where
    R: Runtime + ?Sized,
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    let result = Reporter::new(runtime).policy(policy).report(out, diag);
    let flushed = out.flush().map_err(Error::from);

    match result.and_then(|summary| flushed.map(|()| summary)) {
        Ok(summary) => {
            info!(
                "Reported {} platform(s), {} device(s)",
                summary.platforms, summary.devices
            );
            if summary.skipped == 0 {
                0
            } else {
                warn!("{} quer(ies) skipped", summary.skipped);
                1
            }
        }
        Err(err) => {
            fail(&err, diag);
            1
        }
    }
}

/// Writes a fatal error as the run's single diagnostic line.
pub fn fail<E: Write + ?Sized>(err: &Error, diag: &mut E) {
    let _ = writeln!(diag, "{}", err);
    let _ = diag.flush();
}
