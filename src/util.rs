//! Utility functions

use std::mem;

use crate::cl::cl_uint;

/// Decodes a string attribute buffer.
///
/// OpenCL strings come back NUL-terminated within the probed length; the
/// value ends at the first NUL, or at the end of the buffer if there is none.
pub fn string_from_buf(buf: &[u8]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

/// Decodes a `cl_uint` attribute buffer in native byte order.
///
/// Returns `None` unless the buffer is exactly one `cl_uint` wide.
pub fn uint_from_buf(buf: &[u8]) -> Option<cl_uint> {
    let bytes: [u8; mem::size_of::<cl_uint>()] = buf.try_into().ok()?;
    Some(cl_uint::from_ne_bytes(bytes))
}
