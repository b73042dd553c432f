use std::mem;

use crate::cl::*;
use crate::error::{check, Error, Result};
use crate::runtime::Runtime;
use crate::util::{string_from_buf, uint_from_buf};

/// An OpenCL device.
pub struct Device<'r, R: Runtime + ?Sized> {
    runtime: &'r R,
    id: cl_device_id,
}

impl<'r, R: Runtime + ?Sized> Device<'r, R> {
    /// Size probe then fill, returning the raw attribute bytes.
    fn info_bytes(&self, name: cl_device_info, failure: &'static str) -> Result<Vec<u8>> {
        let size = check(self.runtime.device_info(self.id, name, None), failure)?;
        debug!("Device info {:#06x} is {} byte(s)", name, size);

        let mut buf = vec![0u8; size];
        if size > 0 {
            check(
                self.runtime.device_info(self.id, name, Some(&mut buf)),
                failure,
            )?;
        }
        Ok(buf)
    }

    fn profile_info(&self, name: cl_device_info, failure: &'static str) -> Result<String> {
        self.info_bytes(name, failure)
            .map(|buf| string_from_buf(&buf))
    }

    /// Creates a new device from its OpenCL identifier.
    ///
    /// The identifier validity is not checked.
    ///
    /// # Safety
    ///
    /// `id` must be a device handle `runtime` handed out; queries on any
    /// other value are undefined behaviour for a native runtime.
    pub unsafe fn new_unchecked(runtime: &'r R, id: cl_device_id) -> Device<'r, R> {
        Device { runtime, id }
    }

    /// The device name.
    pub fn name(&self) -> Result<String> {
        self.profile_info(CL_DEVICE_NAME, "Couldn't read device name data")
    }

    /// The width in bits of the device's default address space.
    ///
    /// The runtime reports this as a `cl_uint`; any other probed size is
    /// rejected rather than reinterpreted.
    pub fn address_bits(&self) -> Result<cl_uint> {
        let failure = "Couldn't read CL_DEVICE_ADDRESS_BITS";
        let buf = self.info_bytes(CL_DEVICE_ADDRESS_BITS, failure)?;
        uint_from_buf(&buf).ok_or_else(|| Error::UnexpectedSize {
            message: failure,
            expected: mem::size_of::<cl_uint>(),
            actual: buf.len(),
        })
    }

    /// The space-separated list of extensions the device supports.
    pub fn extensions(&self) -> Result<String> {
        self.profile_info(CL_DEVICE_EXTENSIONS, "Couldn't read CL_DEVICE_EXTENSIONS data")
    }

    /// The device OpenCL id.
    pub fn cl_id(&self) -> cl_device_id {
        self.id
    }
}
