// Layerkeys Event Source
// Lazy line reader over any buffered input

use std::io::{self, BufRead};

/// Yields protocol lines one at a time until end of input.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD, so a garbled line
/// still comes through as a (malformed) line instead of ending the input.
/// The source cannot be restarted: once it reports end of input it stays
/// exhausted.
#[derive(Debug)]
pub struct LineSource<R: BufRead> {
    reader: R,
    exhausted: bool,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            exhausted: false,
        }
    }
}

impl LineSource<io::StdinLock<'static>> {
    /// Line source over the process's standard input
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                self.exhausted = true;
                None
            }
            Ok(_) => {
                let mut line = match String::from_utf8(buf) {
                    Ok(line) => line,
                    Err(e) => {
                        log::debug!("Input line is not valid UTF-8: {}", e.utf8_error());
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    }
                };
                let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed_len);
                Some(Ok(line))
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_without_terminators() {
        let source = LineSource::new(Cursor::new("PRESS w1\r\nRELEASE w1\nlast"));
        let lines: Vec<String> = source.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["PRESS w1", "RELEASE w1", "last"]);
    }

    #[test]
    fn test_keeps_blank_lines() {
        let source = LineSource::new(Cursor::new("\n\nPRESS w1\n"));
        let lines: Vec<String> = source.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["", "", "PRESS w1"]);
    }

    #[test]
    fn test_invalid_utf8_line_is_kept() {
        let source = LineSource::new(Cursor::new(b"PRESS \xff\xfe\nPRESS w1\n".to_vec()));
        let lines: Vec<String> = source.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["PRESS \u{FFFD}\u{FFFD}", "PRESS w1"]);
    }

    #[test]
    fn test_stays_exhausted() {
        let mut source = LineSource::new(Cursor::new("PRESS w1\n"));
        assert!(source.next().is_some());
        assert!(source.next().is_none());
        assert!(source.next().is_none());
    }
}
