//! Character-stream scanner producing whitespace-delimited words.

use crate::error::{InterpError, Result, Site};

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0c' | '\x0b')
}

#[derive(Debug, Clone)]
pub struct Lexer {
    chars: Vec<char>,
    cursor: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(text: &str) -> Lexer {
        Lexer {
            chars: text.chars().collect(),
            cursor: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn site(&self) -> Site {
        Site {
            line: self.line,
            column: self.column,
        }
    }

    fn get_char(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    fn eat_char(&mut self) -> Option<char> {
        let c = self.get_char()?;
        self.cursor += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.get_char() {
            if is_ws(c) {
                self.eat_char();
            } else {
                break;
            }
        }
    }

    /// Return the next whitespace-delimited word without consuming it.
    pub fn peek_word(&self) -> String {
        let mut cursor = self.cursor;
        while let Some(&c) = self.chars.get(cursor) {
            if is_ws(c) {
                cursor += 1;
            } else {
                break;
            }
        }
        let start = cursor;
        while let Some(&c) = self.chars.get(cursor) {
            if is_ws(c) {
                break;
            }
            cursor += 1;
        }
        self.chars[start..cursor].iter().collect()
    }

    /// Consume and return the next whitespace-delimited word.
    pub fn next_word(&mut self) -> String {
        self.skip_whitespace();
        let mut word = String::new();
        while let Some(c) = self.get_char() {
            if is_ws(c) {
                break;
            }
            word.push(c);
            self.eat_char();
        }
        if let Some(c) = self.get_char() {
            if is_ws(c) {
                self.eat_char();
            }
        }
        word
    }

    /// Consume and return all characters up to (but excluding) `delim`.
    pub fn chars_till(&mut self, delim: char) -> Result<String> {
        let mut body = String::new();
        loop {
            match self.eat_char() {
                Some(c) if c == delim => return Ok(body),
                Some(c) => body.push(c),
                None => {
                    return Err(InterpError::UnterminatedString {
                        word: body,
                        site: self.site(),
                    })
                }
            }
        }
    }

    /// Consume and return all characters up to (but excluding) the multi-character `end` marker.
    pub fn chars_till_multiline(&mut self, end: &str) -> Result<String> {
        let end_chars: Vec<char> = end.chars().collect();
        let mut body = String::new();
        loop {
            if self.chars[self.cursor..].starts_with(&end_chars[..]) {
                for _ in 0..end_chars.len() {
                    self.eat_char();
                }
                return Ok(body);
            }
            match self.eat_char() {
                Some(c) => body.push(c),
                None => {
                    return Err(InterpError::UnterminatedString {
                        word: body,
                        site: self.site(),
                    })
                }
            }
        }
    }

    pub fn clear_line(&mut self) {
        while let Some(c) = self.eat_char() {
            if c == '\n' {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn at_end(&self) -> bool {
        self.peek_word().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_word_splits_on_whitespace() {
        let mut lx = Lexer::new("  3  4 +  ");
        assert_eq!(lx.next_word(), "3");
        assert_eq!(lx.next_word(), "4");
        assert_eq!(lx.next_word(), "+");
        assert_eq!(lx.next_word(), "");
    }

    #[test]
    fn peek_word_does_not_advance() {
        let mut lx = Lexer::new("DUP DROP");
        assert_eq!(lx.peek_word(), "DUP");
        assert_eq!(lx.peek_word(), "DUP");
        assert_eq!(lx.next_word(), "DUP");
        assert_eq!(lx.peek_word(), "DROP");
    }

    #[test]
    fn chars_till_reads_up_to_delimiter() {
        let mut lx = Lexer::new("hello world\" rest");
        assert_eq!(lx.chars_till('"').unwrap(), "hello world");
        assert_eq!(lx.next_word(), "rest");
    }

    #[test]
    fn chars_till_reports_unterminated() {
        let mut lx = Lexer::new("hello world");
        assert!(lx.chars_till('"').is_err());
    }

    #[test]
    fn chars_till_multiline_reads_to_marker() {
        let mut lx = Lexer::new("line one\nline two'''tail");
        assert_eq!(lx.chars_till_multiline("'''").unwrap(), "line one\nline two");
        assert_eq!(lx.next_word(), "tail");
    }

    #[test]
    fn line_and_column_track_newlines() {
        let mut lx = Lexer::new("a\nbb");
        lx.next_word();
        assert_eq!(lx.site().line, 1);
        lx.next_word();
        assert_eq!(lx.site().line, 2);
    }

    #[test]
    fn clear_line_skips_to_next_newline() {
        let mut lx = Lexer::new("junk here\nDUP");
        lx.clear_line();
        assert_eq!(lx.next_word(), "DUP");
    }
}
