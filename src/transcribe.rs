mod console;
mod logfile;
mod scanner;
mod stamp;
pub mod error;

use std::io::BufRead;
use log::debug;
use crate::transcribe::error::ClogError;

pub use console::{Console, STDIN_DESIGNATOR};
pub use logfile::{Append, Logfile};
pub use scanner::{ScanError, Scanner, MAX_LINE_LEN};
pub use stamp::{Clock, LocalClock, Stamper, Zone};

/// Name prefixed to every diagnostic.
pub const PROG: &str = "clog";

/// Transcribes the console named in `args` into the logfile named in `args`
/// and returns the number of lines written.
///
/// `args` excludes the program name. Both files are closed when this
/// returns, whatever the outcome.
pub fn start<I, S>(args: I) -> Result<u64, ClogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let (console_arg, logfile_arg) = parse_args(args)?;

    let console = Console::open(&console_arg)?;
    let mut logfile = Logfile::open(&logfile_arg)?;
    let console_name = String::from(console.name());

    let stamper = Stamper::local();
    let mut transcriber = Transcriber::new(LocalClock, stamper);
    let count = transcriber.run(Scanner::new(console.into_reader()), &mut logfile)
        .map_err(|e| e.into_clog_error(&console_name, logfile.path()))?;

    debug!("transcribe: {} lines from {} to {}", count, console_name, logfile.path());
    Ok(count)
}

fn parse_args<I, S>(args: I) -> Result<(String, String), ClogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positional: Vec<String> = Vec::new();
    let mut flags_done = false;

    for a in args {
        let a = a.as_ref();
        if !flags_done {
            if a == "--" {
                flags_done = true;
                continue;
            }
            if a.len() > 1 && a.starts_with('-') {
                // no flags are defined, -h and --help included
                return Err(ClogError::Usage);
            }
            flags_done = true;
        }
        positional.push(String::from(a));
    }

    match <[String; 2]>::try_from(positional) {
        Ok([console, logfile]) => Ok((console, logfile)),
        Err(_) => Err(ClogError::Usage),
    }
}

/// Where a transcription stopped short.
#[derive(Debug)]
pub enum Failure {
    Read(ScanError),
    Write(std::io::Error),
    Stamp(ClogError),
}

impl Failure {
    fn into_clog_error(self, console: &str, logfile: &str) -> ClogError {
        match self {
            Failure::Read(ScanError::Io(e)) => ClogError::Read { source: e, path: String::from(console) },
            Failure::Read(ScanError::TooLong { limit }) => ClogError::LineTooLong { path: String::from(console), limit },
            Failure::Write(e) => ClogError::Write { source: e, path: String::from(logfile) },
            Failure::Stamp(e) => e,
        }
    }
}

pub struct Transcriber<C> {
    clock: C,
    stamper: Stamper,
}

impl<C: Clock> Transcriber<C> {
    pub fn new(clock: C, stamper: Stamper) -> Transcriber<C> {
        Transcriber { clock, stamper }
    }

    /// Writes every line of `lines` to `sink` as `<timestamp>: <line>`.
    ///
    /// Stops at the first read or write failure; lines before it have
    /// already been handed to `sink`.
    pub fn run<R: BufRead, A: Append>(&mut self, lines: Scanner<R>, sink: &mut A) -> Result<u64, Failure> {
        let mut count: u64 = 0;

        for line in lines {
            let line = line.map_err(Failure::Read)?;
            let stamp = self.stamper.format(self.clock.now()).map_err(Failure::Stamp)?;

            let mut record: Vec<u8> = Vec::with_capacity(stamp.len() + line.len() + 2);
            record.extend_from_slice(stamp.as_bytes());
            record.extend_from_slice(b": ");
            record.extend_from_slice(&line);

            sink.append(&record).map_err(Failure::Write)?;
            count += 1;
        }

        Ok(count)
    }
}
