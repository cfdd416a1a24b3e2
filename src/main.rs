#[macro_use] extern crate log;
extern crate simplelog;

use simplelog::*;

use std::env;
use std::io;
use std::process::ExitCode;
use clog::transcribe::{self, error::ClogError, PROG};

fn main() -> ExitCode {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_max_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();
    let logged = WriteLogger::init(LevelFilter::Error, config, io::stderr()).is_ok();

    match transcribe::start(env::args().skip(1)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let line = match e {
                ClogError::Usage => e.to_string(),
                _ => format!("{}: {}", PROG, e),
            };
            report(logged, &line);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Writes the fatal line through the logger, or straight to stderr when no
/// logger could be installed.
fn report(logged: bool, line: &str) {
    if logged {
        error!("{}", line);
    } else {
        eprintln!("{}", line);
    }
}
