use std::io;
use thiserror::Error;

pub const USAGE: &str = "usage: clog console logfile";

#[derive(Debug, Error)]
pub enum ClogError {
    #[error("{}", USAGE)]
    Usage,
    #[error("open {path}: {}", describe(.source))]
    SourceOpen {
        #[source]
        source: io::Error,
        path: String,
    },
    #[error("open {path}: {}", describe(.source))]
    SinkOpen {
        #[source]
        source: io::Error,
        path: String,
    },
    #[error("seek {path}: {}", describe(.source))]
    SinkSeek {
        #[source]
        source: io::Error,
        path: String,
    },
    #[error("read {path}: {}", describe(.source))]
    Read {
        #[source]
        source: io::Error,
        path: String,
    },
    #[error("read {path}: line too long (limit {limit} bytes)")]
    LineTooLong { path: String, limit: usize },
    #[error("write {path}: {}", describe(.source))]
    Write {
        #[source]
        source: io::Error,
        path: String,
    },
    #[error("formatting timestamp: {source}")]
    Timestamp {
        #[source]
        source: time::error::Format,
    },
}

impl ClogError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ClogError::Usage => 2,
            _ => 1,
        }
    }
}

/// `io::Error` text without the trailing `(os error N)`.
fn describe(e: &io::Error) -> String {
    let text = e.to_string();
    match (e.raw_os_error(), text.rfind(" (os error ")) {
        (Some(_), Some(at)) => String::from(&text[..at]),
        _ => text,
    }
}
