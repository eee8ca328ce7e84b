//! Whitespace tokenizer.

use std::io::{self, BufRead};

use reltrack::{MAX_NAME_LEN, Name};

/// Splits a byte stream into whitespace-separated tokens.
///
/// Tokens longer than [`MAX_NAME_LEN`] bytes are truncated; the rest of the
/// run is skipped up to the next whitespace.
pub struct Tokenizer<R> {
    reader: R,
    token: Vec<u8>,
    line: usize,
    token_line: usize,
}

impl<R: BufRead> Tokenizer<R> {
    /// Wrap a buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            token: Vec::with_capacity(MAX_NAME_LEN),
            line: 1,
            token_line: 1,
        }
    }

    /// Line on which the most recent token started, starting at 1.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.token_line
    }

    /// Read the next token. `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> io::Result<Option<Name>> {
        self.token.clear();

        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if buf.is_empty() {
                return Ok(self.take_token());
            }

            let mut used = 0;
            let mut complete = false;
            for &byte in buf {
                used += 1;
                // Separators: space, tab, newline, carriage return, form feed.
                if byte.is_ascii_whitespace() {
                    if byte == b'\n' {
                        self.line += 1;
                    }
                    if self.token.is_empty() {
                        continue;
                    }
                    complete = true;
                    break;
                }
                if self.token.is_empty() {
                    self.token_line = self.line;
                }
                if self.token.len() < MAX_NAME_LEN {
                    self.token.push(byte);
                }
            }
            self.reader.consume(used);

            if complete {
                return Ok(self.take_token());
            }
        }
    }

    fn take_token(&mut self) -> Option<Name> {
        if self.token.is_empty() {
            None
        } else {
            Some(Name::new(&self.token))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        let mut tokenizer = Tokenizer::new(input.as_bytes());
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token().unwrap() {
            out.push(token.to_string());
        }
        out
    }

    #[test]
    fn test_splits_on_any_whitespace() {
        assert_eq!(
            tokens("addent  \"a\"\n\taddrel a b\r\nr\x0cend\n"),
            vec!["addent", "\"a\"", "addrel", "a", "b", "r", "end"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokens("").is_empty());
        assert!(tokens(" \n\n ").is_empty());
    }

    #[test]
    fn test_last_token_without_newline() {
        assert_eq!(tokens("report"), vec!["report"]);
    }

    #[test]
    fn test_truncates_long_tokens() {
        let long = "y".repeat(80);
        let out = tokens(&format!("{long} next"));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), MAX_NAME_LEN);
        assert_eq!(out[1], "next");
    }

    #[test]
    fn test_tracks_lines() {
        let mut tokenizer = Tokenizer::new("a\nb\n\nc".as_bytes());
        tokenizer.next_token().unwrap();
        assert_eq!(tokenizer.line(), 1);
        tokenizer.next_token().unwrap();
        assert_eq!(tokenizer.line(), 2);
        tokenizer.next_token().unwrap();
        assert_eq!(tokenizer.line(), 4);
    }
}
