use std::ptr;

use crate::cl::*;
use crate::device::Device;
use crate::error::{check, Result};
use crate::runtime::Runtime;
use crate::util::string_from_buf;

/// Retrieves all the platforms the runtime reports, in runtime order.
///
/// A runtime with no platforms yields an empty list without a fill call.
pub fn platforms<R: Runtime + ?Sized>(runtime: &R) -> Result<Vec<Platform<'_, R>>> {
    let num_platforms = check(runtime.platform_ids(None), "Couldn't find any platforms")?;
    debug!("Runtime reports {} platform(s)", num_platforms);

    if num_platforms == 0 {
        return Ok(Vec::new());
    }

    let mut ids: Vec<cl_platform_id> = vec![ptr::null_mut(); num_platforms as usize];
    let written = check(
        runtime.platform_ids(Some(&mut ids)),
        "Couldn't read platform list",
    )?;
    ids.truncate(written.min(num_platforms) as usize);

    Ok(ids.into_iter().map(|id| Platform { runtime, id }).collect())
}

/// A string-valued platform attribute, in report order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlatformAttribute {
    Name,
    Vendor,
    Version,
    Profile,
    Extensions,
}

impl PlatformAttribute {
    /// Every attribute the report prints, in the order it prints them.
    pub const ALL: [PlatformAttribute; 5] = [
        PlatformAttribute::Name,
        PlatformAttribute::Vendor,
        PlatformAttribute::Version,
        PlatformAttribute::Profile,
        PlatformAttribute::Extensions,
    ];

    pub fn param(self) -> cl_platform_info {
        match self {
            PlatformAttribute::Name => CL_PLATFORM_NAME,
            PlatformAttribute::Vendor => CL_PLATFORM_VENDOR,
            PlatformAttribute::Version => CL_PLATFORM_VERSION,
            PlatformAttribute::Profile => CL_PLATFORM_PROFILE,
            PlatformAttribute::Extensions => CL_PLATFORM_EXTENSIONS,
        }
    }

    /// Label used on the report line, as in `Platform 0 vendor: ...`.
    pub fn label(self) -> &'static str {
        match self {
            PlatformAttribute::Name => "name",
            PlatformAttribute::Vendor => "vendor",
            PlatformAttribute::Version => "version",
            PlatformAttribute::Profile => "profile",
            PlatformAttribute::Extensions => "supports extensions",
        }
    }

    fn failure(self) -> &'static str {
        match self {
            PlatformAttribute::Name => "Couldn't read name data.",
            PlatformAttribute::Vendor => "Couldn't read vendor data.",
            PlatformAttribute::Version => "Couldn't read version data.",
            PlatformAttribute::Profile => "Couldn't read profile data.",
            PlatformAttribute::Extensions => "Couldn't read extension data.",
        }
    }
}

/// An OpenCL platform.
pub struct Platform<'r, R: Runtime + ?Sized> {
    runtime: &'r R,
    id: cl_platform_id,
}

impl<'r, R: Runtime + ?Sized> Platform<'r, R> {
    fn get_devices_internal(&self, dtype: cl_device_type) -> Result<Vec<Device<'r, R>>> {
        info!("Looking for devices matching {:#x}", dtype);

        let num_devices = check(
            self.runtime.device_ids(self.id, dtype, None),
            "Couldn't find any devices",
        )?;
        debug!("Platform reports {} device(s)", num_devices);

        if num_devices == 0 {
            return Ok(Vec::new());
        }

        let mut ids: Vec<cl_device_id> = vec![ptr::null_mut(); num_devices as usize];
        let written = check(
            self.runtime.device_ids(self.id, dtype, Some(&mut ids)),
            "Couldn't read device list",
        )?;
        ids.truncate(written.min(num_devices) as usize);

        Ok(ids
            .into_iter()
            .map(|id| unsafe { Device::new_unchecked(self.runtime, id) })
            .collect())
    }

    /// Gets all the devices available with this platform.
    pub fn get_devices(&self) -> Result<Vec<Device<'r, R>>> {
        self.get_devices_internal(CL_DEVICE_TYPE_ALL)
    }

    /// Runs the size probe and fill for one attribute.
    ///
    /// The buffer is exactly as long as the probe reports and is dropped
    /// before this returns.
    fn profile_info(&self, name: cl_platform_info, failure: &'static str) -> Result<String> {
        let size = check(self.runtime.platform_info(self.id, name, None), failure)?;
        debug!("Platform info {:#06x} is {} byte(s)", name, size);

        if size == 0 {
            return Ok(String::new());
        }

        let mut buf = vec![0u8; size];
        check(
            self.runtime.platform_info(self.id, name, Some(&mut buf)),
            failure,
        )?;

        Ok(string_from_buf(&buf))
    }

    /// Gets the OpenCL platform identifier.
    pub fn get_id(&self) -> cl_platform_id {
        self.id
    }

    /// Reads one of the report's platform attributes.
    pub fn info(&self, attribute: PlatformAttribute) -> Result<String> {
        self.profile_info(attribute.param(), attribute.failure())
    }

    /// Gets the platform name.
    pub fn name(&self) -> Result<String> {
        self.info(PlatformAttribute::Name)
    }

    /// Gets the platform version.
    pub fn version(&self) -> Result<String> {
        self.info(PlatformAttribute::Version)
    }

    /// Gets the platform profile.
    pub fn profile(&self) -> Result<String> {
        self.info(PlatformAttribute::Profile)
    }

    /// Gets the platform vendor.
    pub fn vendor(&self) -> Result<String> {
        self.info(PlatformAttribute::Vendor)
    }

    /// Gets the supported platform extensions.
    pub fn extensions(&self) -> Result<String> {
        self.info(PlatformAttribute::Extensions)
    }
}
