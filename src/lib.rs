//! OpenCL capability discovery.
//!
//! Lists the platforms an OpenCL runtime exposes and the devices attached
//! to each, and reports their name, vendor, version, profile, extensions
//! and address width. Every attribute is read with the two-phase query the
//! API prescribes: a size probe without a destination, then a fill into a
//! buffer of exactly that size.

#[macro_use]
extern crate log;

/// Low-level OpenCL types and entry points. These should primarily be used
/// by the higher level types in this library.
pub mod cl;
pub mod config;
pub mod device;
pub mod error;
pub mod platform;
pub mod report;
pub mod runtime;
pub mod util;

pub use config::Config;
pub use device::Device;
pub use error::{Error, Result};
pub use platform::{platforms, Platform, PlatformAttribute};
pub use report::{run, FailurePolicy, Reporter, Summary};
pub use runtime::{Native, Runtime};
