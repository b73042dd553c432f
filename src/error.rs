//! Error handling utilities.

use std::io;

use thiserror::Error;

use crate::cl::{cl_int, status_name};

/// Everything that can stop a capability report.
#[derive(Debug, Error)]
pub enum Error {
    /// A runtime query returned a non-success status.
    #[error("{message} ({})", status_str(.status))]
    Query {
        message: &'static str,
        status: cl_int,
    },

    /// A fixed-width attribute probed to the wrong number of bytes.
    #[error("{message} (expected {expected} bytes, runtime reported {actual})")]
    UnexpectedSize {
        message: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The OpenCL library could not be opened or lacks an entry point.
    #[error("Couldn't load OpenCL library {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("Invalid value {value:?} for {var}")]
    Config { var: &'static str, value: String },

    #[error("Couldn't write report: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failure concerns a single query, as opposed to the
    /// environment the report runs in.
    pub fn is_query(&self) -> bool {
        matches!(self, Error::Query { .. } | Error::UnexpectedSize { .. })
    }
}

/// Renders a status code by name, falling back to the raw number.
pub fn error_str(status: cl_int) -> String {
    match status_name(status) {
        Some(name) => name.to_string(),
        None => format!("Unknown Error: {}", status),
    }
}

fn status_str(status: &cl_int) -> String {
    error_str(*status)
}

/// Turns a failed runtime call into a query error labelled with `message`.
pub fn check<T>(result: std::result::Result<T, cl_int>, message: &'static str) -> Result<T> {
    result.map_err(|status| Error::Query { message, status })
}
