use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use log::debug;
use crate::transcribe::error::ClogError;

#[cfg(unix)]
const CREATE_MODE: u32 = 0o666;

/// Append-only destination of the transcript.
pub struct Logfile {
    path: String,
    file: File,
}

impl Logfile {
    /// Opens `path` for appending, creating it if needed, and positions the
    /// handle at the current end of the file.
    pub fn open(path: &str) -> Result<Logfile, ClogError> {
        let mut opts = OpenOptions::new();
        opts.create(true).append(true);
        #[cfg(unix)]
        opts.mode(CREATE_MODE);

        let mut file = opts.open(path).map_err(|e| {
            ClogError::SinkOpen { source: e, path: String::from(path) }
        })?;

        let end = file.seek(SeekFrom::End(0)).map_err(|e| {
            ClogError::SinkSeek { source: e, path: String::from(path) }
        })?;
        debug!("logfile: opened {} at offset {}", path, end);

        Ok(Logfile { path: String::from(path), file })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Destination of transcribed lines.
pub trait Append {
    /// Writes `line` and a trailing newline as one record.
    fn append(&mut self, line: &[u8]) -> io::Result<()>;
}

impl Append for Logfile {
    fn append(&mut self, line: &[u8]) -> io::Result<()> {
        let mut record: Vec<u8> = Vec::with_capacity(line.len() + 1);
        record.extend_from_slice(line);
        record.push(b'\n');
        self.file.write_all(&record)
    }
}
