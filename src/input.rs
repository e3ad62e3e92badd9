use std::io::{BufRead, ErrorKind};

use crate::error::ScalcError;

/// Numbers read from whitespace-separated text.
///
/// Only the token being assembled is held in memory, so input without line
/// breaks is read in constant space. Yields `Err` for the first token that
/// is not a number or for a failed read; callers are expected to stop there.
#[derive(Debug)]
pub struct Tokens<R> {
    reader: R,
    token: Vec<u8>,
    line_number: usize,
}

// same set as C's isspace in the "C" locale
fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Tokens<R> {
        Tokens {
            reader,
            token: Vec::new(),
            line_number: 1,
        }
    }

    /// Collects the next token into `self.token` and returns the line it
    /// started on, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<usize>, ScalcError> {
        self.token.clear();
        let mut line = self.line_number;

        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if buf.is_empty() {
                break;
            }

            let mut consumed = 0;
            let mut complete = false;
            for &byte in buf {
                if is_separator(byte) {
                    if !self.token.is_empty() {
                        complete = true;
                        break;
                    }
                    if byte == b'\n' {
                        self.line_number += 1;
                    }
                } else {
                    if self.token.is_empty() {
                        line = self.line_number;
                    }
                    self.token.push(byte);
                }
                consumed += 1;
            }
            self.reader.consume(consumed);

            if complete {
                break;
            }
        }

        if self.token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

fn parse_number(token: &[u8], line: usize) -> Result<f64, ScalcError> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| ScalcError::Parse {
            token: String::from_utf8_lossy(token).into_owned(),
            line,
        })
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = Result<f64, ScalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Some(line)) => Some(parse_number(&self.token, line)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
