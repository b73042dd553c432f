use std::io;
use std::process;

use clreport::report::{self, fail};
use clreport::{Config, Native, Result};

fn setup() -> Result<(Config, Native)> {
    let config = Config::from_env()?;
    let native = Native::load(config.library.as_deref().map(|path| path.as_os_str()))?;
    Ok((config, native))
}

fn main() {
    env_logger::init();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut diag = stderr.lock();

    let code = match setup() {
        Ok((config, native)) => report::run(&native, config.on_error, &mut out, &mut diag),
        Err(err) => {
            fail(&err, &mut diag);
            1
        }
    };

    process::exit(code);
}
