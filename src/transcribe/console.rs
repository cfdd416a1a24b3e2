use std::fs::File;
use std::io::{self, BufRead, BufReader};
use log::debug;
use crate::transcribe::error::ClogError;

/// Designator that binds the console to standard input.
pub const STDIN_DESIGNATOR: &str = "-";

const STDIN_NAME: &str = "/dev/stdin";

/// The line source being transcribed.
pub struct Console {
    name: String,
    reader: Box<dyn BufRead>,
}

impl Console {
    pub fn open(designator: &str) -> Result<Console, ClogError> {
        if designator == STDIN_DESIGNATOR {
            debug!("console: reading from standard input");
            return Ok(Console {
                name: String::from(STDIN_NAME),
                reader: Box::new(io::stdin().lock()),
            });
        }

        let f = File::open(designator).map_err(|e| {
            ClogError::SourceOpen { source: e, path: String::from(designator) }
        })?;
        debug!("console: opened {}", designator);

        Ok(Console {
            name: String::from(designator),
            reader: Box::new(BufReader::new(f)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_reader(self) -> Box<dyn BufRead> {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::io::Write;

    #[test]
    fn opens_named_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "boot ok\n").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let console = Console::open(&path).unwrap();
        assert_eq!(console.name(), path);

        let mut content = String::new();
        console.into_reader().read_to_string(&mut content).unwrap();
        assert_eq!(content, "boot ok\n");
    }

    #[test]
    fn missing_file_is_source_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").to_string_lossy().to_string();

        match Console::open(&path) {
            Err(ClogError::SourceOpen { source, path: p }) => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
                assert_eq!(p, path);
            },
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn dash_names_standard_input() {
        let console = Console::open(STDIN_DESIGNATOR).unwrap();
        assert_eq!(console.name(), STDIN_NAME);
    }
}
