//! Environment-driven configuration.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::report::FailurePolicy;

/// Path of the OpenCL library to load instead of the platform default.
pub const LIBRARY_VAR: &str = "CLREPORT_OPENCL_LIBRARY";
/// `abort` or `skip`; see [`FailurePolicy`].
pub const ON_ERROR_VAR: &str = "CLREPORT_ON_ERROR";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub library: Option<PathBuf>,
    pub on_error: FailurePolicy,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|var| env::var_os(var))
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let set = |var: &str| lookup(var).filter(|value| !value.is_empty());

        let library = set(LIBRARY_VAR).map(PathBuf::from);
        let on_error = match set(ON_ERROR_VAR) {
            Some(value) => {
                let value = value.to_string_lossy();
                value.parse::<FailurePolicy>().map_err(|()| Error::Config {
                    var: ON_ERROR_VAR,
                    value: value.into_owned(),
                })?
            }
            None => FailurePolicy::default(),
        };

        debug!("library: {:?}, on error: {:?}", library, on_error);
        Ok(Config { library, on_error })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.on_error, FailurePolicy::Abort);
        assert!(config.library.is_none());
    }

    #[test]
    fn reads_library_and_policy() {
        let config = Config::from_lookup(lookup(&[
            (LIBRARY_VAR, "/opt/rocm/lib/libOpenCL.so"),
            (ON_ERROR_VAR, "Skip"),
        ]))
        .unwrap();
        assert_eq!(config.library, Some(PathBuf::from("/opt/rocm/lib/libOpenCL.so")));
        assert_eq!(config.on_error, FailurePolicy::Skip);
    }

    #[test]
    fn empty_values_are_unset() {
        let config = Config::from_lookup(lookup(&[(LIBRARY_VAR, ""), (ON_ERROR_VAR, "")])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = Config::from_lookup(lookup(&[(ON_ERROR_VAR, "retry")])).unwrap_err();
        match err {
            Error::Config { var, value } => {
                assert_eq!(var, ON_ERROR_VAR);
                assert_eq!(value, "retry");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
