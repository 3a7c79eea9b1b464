//! Tokenizer for DataLisp source.

use crate::diagnostics::{Diagnostics, Position};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    /// `$(`
    ExprOpen,
    Comma,
    Colon,
    Ident(String),
    Str(String),
    /// Literal text, sign included.
    Integer(String),
    Float(String),
    True,
    False,
    Null,
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::ExprOpen => "$(",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Str(_) => "string",
            TokenKind::Integer(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

/// Split `text` into tokens. The result always ends with [`TokenKind::Eof`].
pub(crate) fn tokenize(text: &str) -> (Vec<Token>, Diagnostics) {
    Lexer::new(text).run()
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: u32,
    column: u32,
    diagnostics: Diagnostics,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 1,
            diagnostics: Diagnostics::new(),
        }
    }

    fn run(mut self) -> (Vec<Token>, Diagnostics) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.diagnostics)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn next_token(&mut self) -> Token {
        loop {
            let start = self.position();
            let Some(c) = self.peek() else {
                return Token {
                    kind: TokenKind::Eof,
                    position: start,
                };
            };

            let kind = match c {
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                ';' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                    continue;
                }
                '(' => self.single(TokenKind::OpenParen),
                ')' => self.single(TokenKind::CloseParen),
                '[' => self.single(TokenKind::OpenBracket),
                ']' => self.single(TokenKind::CloseBracket),
                ',' => self.single(TokenKind::Comma),
                ':' => self.single(TokenKind::Colon),
                '$' => {
                    self.bump();
                    if self.peek() != Some('(') {
                        self.diagnostics.error(start, "expected '(' after '$'");
                        continue;
                    }
                    self.single(TokenKind::ExprOpen)
                }
                '"' | '\'' => self.string(c, start),
                '0'..='9' | '+' | '-' | '.' => match self.number(start) {
                    Some(kind) => kind,
                    None => continue,
                },
                c if c.is_ascii_alphabetic() || c == '_' => self.word(),
                other => {
                    self.bump();
                    self.diagnostics.error(start, format!("invalid character '{other}'"));
                    continue;
                }
            };
            return Token { kind, position: start };
        }
    }

    fn word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(c) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
            self.bump();
            word.push(c);
        }
        match word.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident(word),
        }
    }

    fn digits(&mut self, text: &mut String) -> bool {
        let mut any = false;
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            self.bump();
            text.push(c);
            any = true;
        }
        any
    }

    /// Integer: sign and digits only. Float: digits with a fraction, an
    /// exponent, or both.
    fn number(&mut self, start: Position) -> Option<TokenKind> {
        let mut text = String::new();
        if let Some(sign @ ('+' | '-')) = self.peek() {
            self.bump();
            text.push(sign);
        }

        let mut has_digits = self.digits(&mut text);
        let mut has_dot = false;
        if self.peek() == Some('.') {
            self.bump();
            text.push('.');
            has_dot = true;
            has_digits |= self.digits(&mut text);
        }

        let mut has_exponent = false;
        let mut exponent_digits = false;
        if let Some(e @ ('e' | 'E')) = self.peek() {
            self.bump();
            text.push(e);
            has_exponent = true;
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.bump();
                text.push(sign);
            }
            exponent_digits = self.digits(&mut text);
        }

        match (has_digits, has_dot, has_exponent) {
            (true, false, false) => Some(TokenKind::Integer(text)),
            (true, _, true) if exponent_digits => Some(TokenKind::Float(text)),
            (true, true, false) => Some(TokenKind::Float(text)),
            _ => {
                self.diagnostics.error(start, format!("invalid number '{text}'"));
                None
            }
        }
    }

    /// Quoted string. `\x` escapes insert raw bytes, so the text is
    /// assembled as bytes and validated at the end.
    fn string(&mut self, quote: char, start: Position) -> TokenKind {
        self.bump();
        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.diagnostics.error(start, "unterminated string");
                    break;
                }
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    self.escape(&mut bytes);
                }
                Some(c) => {
                    self.bump();
                    push_char(&mut bytes, c);
                }
            }
        }

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                self.diagnostics.error(start, "string is not valid UTF-8");
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        TokenKind::Str(text)
    }

    fn escape(&mut self, bytes: &mut Vec<u8>) {
        let position = self.position();
        let Some(c) = self.bump() else {
            self.diagnostics.error(position, "unfinished escape sequence");
            return;
        };

        let literal = match c {
            // Line continuation.
            '\n' => return,
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            'x' => {
                if let Some(byte) = self.hex(2, position) {
                    bytes.push(byte as u8);
                }
                return;
            }
            'u' | 'U' => {
                let width = if c == 'u' { 4 } else { 8 };
                if let Some(code) = self.hex(width, position) {
                    match char::from_u32(code) {
                        Some(ch) => push_char(bytes, ch),
                        None => self
                            .diagnostics
                            .error(position, format!("invalid Unicode scalar value {code:#x}")),
                    }
                }
                return;
            }
            other => other,
        };
        push_char(bytes, literal);
    }

    fn hex(&mut self, width: usize, position: Position) -> Option<u32> {
        let mut digits = String::with_capacity(width);
        while digits.len() < width {
            match self.peek().filter(char::is_ascii_hexdigit) {
                Some(c) => {
                    self.bump();
                    digits.push(c);
                }
                None => {
                    self.diagnostics
                        .error(position, format!("escape sequence needs {width} hex digits"));
                    return None;
                }
            }
        }
        u32::from_str_radix(&digits, 16).ok()
    }
}

fn push_char(bytes: &mut Vec<u8>, c: char) {
    let mut buf = [0; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = tokenize(text);
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn single(text: &str) -> TokenKind {
        kinds(text).remove(0)
    }

    #[test]
    fn test_punctuation_and_words() {
        assert_eq!(
            kinds("(a, :b $(c) [true false null])"),
            vec![
                TokenKind::OpenParen,
                TokenKind::Ident("a".into()),
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::Ident("b".into()),
                TokenKind::ExprOpen,
                TokenKind::Ident("c".into()),
                TokenKind::CloseParen,
                TokenKind::OpenBracket,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::CloseBracket,
                TokenKind::CloseParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        for text in ["1", "+1", "-1", "42"] {
            assert_eq!(single(text), TokenKind::Integer(text.into()), "{text}");
        }
        for text in [
            "1.0", "+1.0", "-1.0", "1e42", "+1e42", "-1e42", "1e+42", "+1e+42", "-1e+42", "1e-42",
            "+1e-42", "-1e-42", "1.0e42", "+1.0e42", "-1.0e42", "1.0e+42", "+1.0e+42", "-1.0e+42",
            "1.0e-42", "+1.0e-42", "-1.0e-42", ".5", "5.",
        ] {
            assert_eq!(single(text), TokenKind::Float(text.into()), "{text}");
        }
    }

    #[test]
    fn test_invalid_numbers() {
        for text in ["-", "+", ".", "1e", "1.0e+"] {
            let (_, diagnostics) = tokenize(text);
            assert_eq!(diagnostics.error_count(), 1, "{text}");
        }
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(single(r#""a\tb\n""#), TokenKind::Str("a\tb\n".into()));
        assert_eq!(single(r"'single \' quote'"), TokenKind::Str("single ' quote".into()));
        assert_eq!(single("\"line \\\ncontinued\""), TokenKind::Str("line continued".into()));
        assert_eq!(single(r#""\q""#), TokenKind::Str("q".into()));
    }

    #[test]
    fn test_unicode_escapes() {
        let bullet = "\u{2022}";
        assert_eq!(single(r#""\xE2\x80\xA2""#), TokenKind::Str(bullet.into()));
        assert_eq!(single(r#""•""#), TokenKind::Str(bullet.into()));
        assert_eq!(single(r#""\U00002022""#), TokenKind::Str(bullet.into()));
        assert_eq!(single("\"\u{2022}\""), TokenKind::Str(bullet.into()));
    }

    #[test]
    fn test_bad_escapes() {
        let (_, diagnostics) = tokenize(r#""\u12""#);
        assert_eq!(diagnostics.error_count(), 1);

        let (_, diagnostics) = tokenize(r#""\xFF""#);
        assert_eq!(
            diagnostics.first_error().map(|d| d.message.as_str()),
            Some("string is not valid UTF-8")
        );
    }

    #[test]
    fn test_comments_and_positions() {
        let (tokens, _) = tokenize("; header\n  (x ; trailing\n 1)");
        let positions: Vec<(u32, u32)> = tokens
            .iter()
            .map(|t| (t.position.line, t.position.column))
            .collect();
        assert_eq!(positions, [(2, 3), (2, 4), (3, 2), (3, 3), (3, 4)]);
    }

    #[test]
    fn test_invalid_characters_are_skipped() {
        let (tokens, diagnostics) = tokenize("(a # b)");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(tokens.len(), 5);

        let (_, diagnostics) = tokenize("$x");
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, diagnostics) = tokenize("\"open\n)");
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Str("open".into()));
        assert_eq!(tokens[1].kind, TokenKind::CloseParen);
    }
}
