//! The capability-query service the reporter consumes.
//!
//! [`Runtime`] exposes the four OpenCL calls capability discovery depends on,
//! each in its two-phase shape: called with no destination it only reports a
//! count or byte length, called with a destination it fills it. [`Native`]
//! forwards to the OpenCL ICD loader found on the host.

use std::ffi::OsStr;
use std::ptr;

use libloading::Library;

use crate::cl::*;
use crate::error::{Error, Result};

/// Access to platform and device queries.
///
/// Every method returns `Err(status)` when the runtime reports anything other
/// than `CL_SUCCESS`.
pub trait Runtime {
    /// Reports the number of platforms available. With `ids`, fills it and
    /// reports how many entries were written.
    fn platform_ids(&self, ids: Option<&mut [cl_platform_id]>) -> std::result::Result<cl_uint, cl_int>;

    /// Reports the byte length of `param` for `platform`. With `value`, fills it.
    fn platform_info(
        &self,
        platform: cl_platform_id,
        param: cl_platform_info,
        value: Option<&mut [u8]>,
    ) -> std::result::Result<usize, cl_int>;

    /// Reports the number of devices of `device_type` on `platform`. With
    /// `ids`, fills it.
    fn device_ids(
        &self,
        platform: cl_platform_id,
        device_type: cl_device_type,
        ids: Option<&mut [cl_device_id]>,
    ) -> std::result::Result<cl_uint, cl_int>;

    /// Reports the byte length of `param` for `device`. With `value`, fills it.
    fn device_info(
        &self,
        device: cl_device_id,
        param: cl_device_info,
        value: Option<&mut [u8]>,
    ) -> std::result::Result<usize, cl_int>;
}

#[cfg(target_os = "macos")]
const DEFAULT_LIBRARIES: &[&str] = &["/System/Library/Frameworks/OpenCL.framework/OpenCL"];

#[cfg(target_os = "windows")]
const DEFAULT_LIBRARIES: &[&str] = &["OpenCL.dll"];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const DEFAULT_LIBRARIES: &[&str] = &["libOpenCL.so.1", "libOpenCL.so"];

/// The host's OpenCL implementation, loaded at run time.
pub struct Native {
    get_platform_ids: ll::clGetPlatformIDs,
    get_platform_info: ll::clGetPlatformInfo,
    get_device_ids: ll::clGetDeviceIDs,
    get_device_info: ll::clGetDeviceInfo,
    // Keeps the entry points above mapped.
    _lib: Library,
}

impl Native {
    /// Opens the OpenCL library at `path`, or the platform's default ICD
    /// loader when `path` is `None`.
    pub fn load(path: Option<&OsStr>) -> Result<Native> {
        match path {
            Some(path) => Native::open(path),
            None => {
                let mut result = Native::open(OsStr::new(DEFAULT_LIBRARIES[0]));
                for candidate in &DEFAULT_LIBRARIES[1..] {
                    match result {
                        Ok(_) => break,
                        Err(ref err) => debug!("{}", err),
                    }
                    result = Native::open(OsStr::new(candidate));
                }
                result
            }
        }
    }

    fn open(path: &OsStr) -> Result<Native> {
        let display = path.to_string_lossy().into_owned();
        let load_err = |source: libloading::Error| Error::Load {
            path: display.clone(),
            source,
        };

        info!("Loading OpenCL from {}", display);

        // SAFETY: the ICD loader has no initialisers with preconditions, and
        // each symbol is read with the signature the OpenCL headers declare.
        unsafe {
            let lib = Library::new(path).map_err(load_err)?;
            let get_platform_ids = *lib
                .get::<ll::clGetPlatformIDs>(b"clGetPlatformIDs\0")
                .map_err(load_err)?;
            let get_platform_info = *lib
                .get::<ll::clGetPlatformInfo>(b"clGetPlatformInfo\0")
                .map_err(load_err)?;
            let get_device_ids = *lib
                .get::<ll::clGetDeviceIDs>(b"clGetDeviceIDs\0")
                .map_err(load_err)?;
            let get_device_info = *lib
                .get::<ll::clGetDeviceInfo>(b"clGetDeviceInfo\0")
                .map_err(load_err)?;

            Ok(Native {
                get_platform_ids,
                get_platform_info,
                get_device_ids,
                get_device_info,
                _lib: lib,
            })
        }
    }
}

fn status_to_result<T>(status: cl_int, value: T) -> std::result::Result<T, cl_int> {
    if status == CL_SUCCESS {
        Ok(value)
    } else {
        Err(status)
    }
}

impl Runtime for Native {
    fn platform_ids(&self, ids: Option<&mut [cl_platform_id]>) -> std::result::Result<cl_uint, cl_int> {
        let mut num_platforms: cl_uint = 0;
        let status = unsafe {
            match ids {
                Some(ids) => (self.get_platform_ids)(
                    ids.len() as cl_uint,
                    ids.as_mut_ptr(),
                    &mut num_platforms,
                ),
                None => (self.get_platform_ids)(0, ptr::null_mut(), &mut num_platforms),
            }
        };
        status_to_result(status, num_platforms)
    }

    fn platform_info(
        &self,
        platform: cl_platform_id,
        param: cl_platform_info,
        value: Option<&mut [u8]>,
    ) -> std::result::Result<usize, cl_int> {
        let mut size: libc::size_t = 0;
        let status = unsafe {
            match value {
                Some(buf) => (self.get_platform_info)(
                    platform,
                    param,
                    buf.len(),
                    buf.as_mut_ptr() as *mut libc::c_void,
                    &mut size,
                ),
                None => (self.get_platform_info)(platform, param, 0, ptr::null_mut(), &mut size),
            }
        };
        status_to_result(status, size)
    }

    fn device_ids(
        &self,
        platform: cl_platform_id,
        device_type: cl_device_type,
        ids: Option<&mut [cl_device_id]>,
    ) -> std::result::Result<cl_uint, cl_int> {
        let mut num_devices: cl_uint = 0;
        let status = unsafe {
            match ids {
                Some(ids) => (self.get_device_ids)(
                    platform,
                    device_type,
                    ids.len() as cl_uint,
                    ids.as_mut_ptr(),
                    &mut num_devices,
                ),
                None => (self.get_device_ids)(
                    platform,
                    device_type,
                    0,
                    ptr::null_mut(),
                    &mut num_devices,
                ),
            }
        };
        status_to_result(status, num_devices)
    }

    fn device_info(
        &self,
        device: cl_device_id,
        param: cl_device_info,
        value: Option<&mut [u8]>,
    ) -> std::result::Result<usize, cl_int> {
        let mut size: libc::size_t = 0;
        let status = unsafe {
            match value {
                Some(buf) => (self.get_device_info)(
                    device,
                    param,
                    buf.len(),
                    buf.as_mut_ptr() as *mut libc::c_void,
                    &mut size,
                ),
                None => (self.get_device_info)(device, param, 0, ptr::null_mut(), &mut size),
            }
        };
        status_to_result(status, size)
    }
}
