use std::fmt;
use std::io::{self, BufRead};

/// Largest line accepted, terminator bytes included.
pub const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Debug)]
pub enum ScanError {
    Io(io::Error),
    TooLong { limit: usize },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanError::Io(e) => write!(f, "{}", e),
            ScanError::TooLong { limit } => write!(f, "line too long (limit {} bytes)", limit),
        }
    }
}

impl std::error::Error for ScanError {}

/// Pulls `\n` terminated lines out of a reader.
///
/// `Some(Ok(_))` carries a line with its terminator (and a trailing `\r`)
/// removed, `None` means the reader is exhausted, `Some(Err(_))` is the last
/// item the scanner ever yields.
pub struct Scanner<R> {
    reader: R,
    limit: usize,
    done: bool,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Scanner<R> {
        Scanner::with_limit(reader, MAX_LINE_LEN)
    }

    pub fn with_limit(reader: R, limit: usize) -> Scanner<R> {
        Scanner { reader, limit, done: false }
    }

    fn scan(&mut self) -> Result<Option<Vec<u8>>, ScanError> {
        let mut line: Vec<u8> = Vec::new();

        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScanError::Io(e)),
            };

            if available.is_empty() {
                if line.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(trim_cr(line)));
            }

            match available.iter().position(|b| *b == b'\n') {
                Some(i) => {
                    if line.len() + i + 1 > self.limit {
                        return Err(ScanError::TooLong { limit: self.limit });
                    }
                    line.extend_from_slice(&available[..i]);
                    self.reader.consume(i + 1);
                    return Ok(Some(trim_cr(line)));
                },
                None => {
                    let n = available.len();
                    if line.len() + n > self.limit {
                        return Err(ScanError::TooLong { limit: self.limit });
                    }
                    line.extend_from_slice(available);
                    self.reader.consume(n);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Vec<u8>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.scan() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn trim_cr(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};

    fn collect(input: &[u8]) -> Vec<Vec<u8>> {
        Scanner::new(Cursor::new(input.to_vec()))
            .map(|l| l.unwrap())
            .collect()
    }

    #[test]
    fn splits_lines_in_order() {
        assert_eq!(collect(b"boot ok\ntemp 42\n"), vec![b"boot ok".to_vec(), b"temp 42".to_vec()]);
    }

    #[test]
    fn keeps_unterminated_last_line() {
        assert_eq!(collect(b"one\ntwo"), vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn strips_carriage_return() {
        assert_eq!(collect(b"one\r\ntwo\r\n"), vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn keeps_empty_lines() {
        assert_eq!(collect(b"\n\nx\n"), vec![Vec::new(), Vec::new(), b"x".to_vec()]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn passes_invalid_utf8_through() {
        assert_eq!(collect(b"\xff\xfe ok\n"), vec![b"\xff\xfe ok".to_vec()]);
    }

    #[test]
    fn line_spanning_small_buffer_is_joined() {
        let reader = BufReader::with_capacity(4, Cursor::new(b"abcdefghij\nkl\n".to_vec()));
        let lines: Vec<Vec<u8>> = Scanner::new(reader).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec![b"abcdefghij".to_vec(), b"kl".to_vec()]);
    }

    #[test]
    fn overlong_line_is_an_error_and_ends_the_scan() {
        let mut scanner = Scanner::with_limit(Cursor::new(b"ok\ntoo long line\nafter\n".to_vec()), 8);
        assert_eq!(scanner.next().unwrap().unwrap(), b"ok".to_vec());
        match scanner.next() {
            Some(Err(ScanError::TooLong { limit })) => assert_eq!(limit, 8),
            other => panic!("unexpected item: {:?}", other),
        }
        assert!(scanner.next().is_none());
    }

    #[test]
    fn line_at_limit_is_accepted() {
        let mut scanner = Scanner::with_limit(Cursor::new(b"1234567\n".to_vec()), 8);
        assert_eq!(scanner.next().unwrap().unwrap(), b"1234567".to_vec());
        assert!(scanner.next().is_none());
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"))
        }
    }

    #[test]
    fn read_error_is_distinct_from_exhaustion() {
        let mut scanner = Scanner::new(BufReader::new(Broken));
        match scanner.next() {
            Some(Err(ScanError::Io(e))) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected item: {:?}", other),
        }
        assert!(scanner.next().is_none());
    }

    struct Interrupting {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for Interrupting {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let reader = BufReader::new(Interrupting { interrupted: false, inner: Cursor::new(b"x\n".to_vec()) });
        let lines: Vec<Vec<u8>> = Scanner::new(reader).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec![b"x".to_vec()]);
    }
}
