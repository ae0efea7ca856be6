//! Line-delimited JSON record source.

use std::io::BufRead;

use crate::error::{OsmError, OsmResult};
use crate::object::OsmObject;

/// Reads one [`OsmObject`] per line.
///
/// Blank lines are skipped. Decode failures (bad UTF-8 included) carry the
/// 1-based line number and do not end iteration; the caller decides whether to
/// stop.
#[derive(Debug)]
pub struct JsonLines<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> JsonLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: Vec::new(),
        }
    }

    /// Number of lines consumed so far.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> Iterator for JsonLines<R> {
    type Item = OsmResult<OsmObject>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(OsmError::from(e))),
            }
            self.line += 1;

            let text = match std::str::from_utf8(&self.buf) {
                Ok(text) => text.trim(),
                Err(e) => return Some(Err(OsmError::decode(self.line, e.to_string()))),
            };
            if text.is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(text).map_err(|e| OsmError::decode(self.line, e.to_string())),
            );
        }
    }
}
