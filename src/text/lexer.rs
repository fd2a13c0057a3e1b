use super::{Keyword, Token, TokenStream};

#[doc = r#"
Splits the text format into [`Token`]s.

Besides the tokens themselves it handles:
- `#` and `;` comments, up to the end of the line,
- a backslash right before a line break, which joins the two lines,
- strings spanning several lines, as written by folding,
- hex mode, in which bare words such as `f0` or `7e` are bytes.

# Example
```rust
# use smftext::prelude::*;
let mut lexer = Lexer::new("0 On ch=1 n=c#4 v=64 # a comment\n");
assert_eq!(lexer.next_token(), Token::Int(0));
assert_eq!(lexer.next_token(), Token::Keyword(Keyword::On));
assert_eq!(lexer.next_token(), Token::Keyword(Keyword::Ch));
assert_eq!(lexer.next_token(), Token::Int(1));
assert_eq!(lexer.next_token(), Token::Keyword(Keyword::Note));
assert_eq!(lexer.next_token(), Token::Note("c#4".to_string()));
assert_eq!(lexer.next_token(), Token::Keyword(Keyword::Val));
assert_eq!(lexer.next_token(), Token::Int(64));
assert_eq!(lexer.next_token(), Token::Eol);
assert_eq!(lexer.next_token(), Token::Eof);
```
"#]
pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    token_line: usize,
    hex: bool,
}

impl<'a> Lexer<'a> {
    /// Lex a string
    pub const fn new(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Lex raw bytes; strings may hold any byte
    pub const fn from_bytes(src: &'a [u8]) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            token_line: 1,
            hex: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    /// Skips spaces, comments and escaped line breaks.
    fn skip_blank(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\\' if self.peek_at(1) == Some(b'\n') => {
                    self.pos += 2;
                    self.line += 1;
                }
                b'\\' if self.peek_at(1) == Some(b'\r') && self.peek_at(2) == Some(b'\n') => {
                    self.pos += 3;
                    self.line += 1;
                }
                b'#' | b';' => {
                    while self.peek().is_some_and(|c| c != b'\n') {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        // only ASCII bytes pass the predicates used here
        core::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default()
    }

    fn string(&mut self) -> Token {
        self.pos += 1;
        let mut raw = Vec::new();
        loop {
            let Some(c) = self.peek() else {
                return Token::Error("unterminated string".to_string());
            };
            self.pos += 1;
            match c {
                b'"' => return Token::Str(raw),
                b'\\' => {
                    raw.push(c);
                    if let Some(next) = self.peek() {
                        self.pos += 1;
                        if next == b'\n' {
                            self.line += 1;
                        }
                        raw.push(next);
                    }
                }
                b'\n' => {
                    self.line += 1;
                    raw.push(c);
                }
                _ => raw.push(c),
            }
        }
    }

    fn number(&mut self) -> Token {
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        let hex = self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X'));
        let (digits, radix) = if hex {
            self.pos += 2;
            (self.take_while(|c| c.is_ascii_hexdigit()), 16)
        } else {
            (self.take_while(|c| c.is_ascii_digit()), 10)
        };
        match i64::from_str_radix(digits, radix) {
            Ok(v) if negative => Token::Int(-v),
            Ok(v) => Token::Int(v),
            Err(_) => Token::Error(format!("bad number {digits:?}")),
        }
    }

    fn word(&mut self) -> Token {
        let word = self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, b'#' | b'+' | b'-' | b'_'));
        if self.peek() == Some(b'=') {
            self.pos += 1;
            return match Keyword::from_word(&format!("{word}=")) {
                Some(k) => Token::Keyword(k),
                None => Token::Error(format!("{word}=")),
            };
        }
        if self.hex && word.bytes().all(|c| c.is_ascii_hexdigit()) {
            if let Ok(v) = i64::from_str_radix(word, 16) {
                return Token::Int(v);
            }
        }
        if let Some(k) = Keyword::from_word(word) {
            return Token::Keyword(k);
        }
        if looks_like_note(word) {
            return Token::Note(word.to_string());
        }
        Token::Error(word.to_string())
    }
}

/// `[a-gA-G][#+bB-]?<digits>`
fn looks_like_note(word: &str) -> bool {
    let bytes = word.as_bytes();
    let Some((first, rest)) = bytes.split_first() else {
        return false;
    };
    if !matches!(first.to_ascii_lowercase(), b'a'..=b'g') {
        return false;
    }
    let digits = match rest.split_first() {
        Some((b'#' | b'+' | b'b' | b'B' | b'-', digits)) => digits,
        _ => rest,
    };
    !digits.is_empty() && digits.iter().all(u8::is_ascii_digit)
}

impl TokenStream for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        self.skip_blank();
        self.token_line = self.line;
        let Some(c) = self.peek() else {
            return Token::Eof;
        };
        match c {
            b'\n' => {
                self.pos += 1;
                self.line += 1;
                self.hex = false;
                Token::Eol
            }
            b'"' => self.string(),
            b'/' | b':' => {
                self.pos += 1;
                Token::Slash
            }
            b'0'..=b'9' if self.hex => self.word(),
            b'0'..=b'9' => self.number(),
            b'-' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => self.number(),
            c if c.is_ascii_alphabetic() => self.word(),
            other => {
                self.pos += 1;
                Token::Error(format!("unexpected character {:?}", other as char))
            }
        }
    }

    fn set_hex_mode(&mut self, on: bool) {
        self.hex = on;
    }

    fn line(&self) -> usize {
        self.token_line
    }
}
