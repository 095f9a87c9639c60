//! Bicep tokenizer.
//!
//! Produces a flat token stream with 1-based line numbers and byte spans.
//! Newlines are significant in Bicep (they separate statements, object
//! properties and array items), so they are emitted as tokens; comments and
//! other whitespace are dropped.

use crate::error::BicepError;

/// Multi-character operators, matched before single characters.
const COMPOUND_SYMBOLS: [&str; 11] = [
    "==", "!=", "<=", ">=", "&&", "||", "??", "=~", "!~", "::", ".?",
];

/// Single-character punctuation and operators.
const SYMBOLS: [&str; 22] = [
    "{", "}", "[", "]", "(", ")", ":", ",", ".", "=", "?", "!", "@", "<", ">", "+", "-", "*",
    "/", "%", "|", "&",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(String),
    /// String literal with escapes decoded and interpolations kept verbatim.
    String(String),
    Number(i64),
    Symbol(&'static str),
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: u32,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    pub(crate) fn is_symbol(&self, symbol: &str) -> bool {
        matches!(self.kind, TokenKind::Symbol(s) if s == symbol)
    }

    pub(crate) fn is_ident(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(s) if s == name)
    }
}

/// Tokenize Bicep source. The last token is always [`TokenKind::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, BicepError> {
    Lexer {
        source,
        pos: 0,
        line: 1,
    }
    .run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
}

impl Lexer<'_> {
    fn rest(&self) -> &str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(line: u32, message: impl Into<String>) -> BicepError {
        BicepError::Lex {
            line,
            message: message.into(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, BicepError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek() {
            let start = self.pos;
            let line = self.line;

            let kind = match c {
                '\n' => {
                    self.bump();
                    TokenKind::Newline
                }
                c if c.is_whitespace() => {
                    self.bump();
                    continue;
                }
                '/' if self.rest().starts_with("//") => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                    continue;
                }
                '/' if self.rest().starts_with("/*") => {
                    self.skip_block_comment(line)?;
                    if self.line == line {
                        continue;
                    }
                    TokenKind::Newline
                }
                '\'' if self.rest().starts_with("'''") => {
                    TokenKind::String(self.lex_multiline_string(line)?)
                }
                '\'' => TokenKind::String(self.lex_string(line)?),
                c if c.is_ascii_digit() => self.lex_number(line)?,
                c if c.is_alphabetic() || c == '_' => {
                    while self
                        .peek()
                        .is_some_and(|c| c.is_alphanumeric() || c == '_')
                    {
                        self.bump();
                    }
                    TokenKind::Ident(self.source[start..self.pos].to_owned())
                }
                other => TokenKind::Symbol(self.lex_symbol(other, line)?),
            };

            tokens.push(Token {
                kind,
                line,
                start,
                end: self.pos,
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            line: self.line,
            start: self.pos,
            end: self.pos,
        });
        Ok(tokens)
    }

    fn skip_block_comment(&mut self, line: u32) -> Result<(), BicepError> {
        self.pos += 2;
        loop {
            if self.rest().starts_with("*/") {
                self.pos += 2;
                return Ok(());
            }
            if self.bump().is_none() {
                return Err(Self::error(line, "unterminated block comment"));
            }
        }
    }

    fn lex_number(&mut self, line: u32) -> Result<TokenKind, BicepError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        let digits = &self.source[start..self.pos];
        digits
            .parse()
            .map(TokenKind::Number)
            .map_err(|_| Self::error(line, format!("integer literal out of range: {digits}")))
    }

    fn lex_symbol(&mut self, c: char, line: u32) -> Result<&'static str, BicepError> {
        let symbol = COMPOUND_SYMBOLS
            .iter()
            .chain(SYMBOLS.iter())
            .find(|s| self.rest().starts_with(**s))
            .copied()
            .ok_or_else(|| Self::error(line, format!("unexpected character '{c}'")))?;
        self.pos += symbol.len();
        Ok(symbol)
    }

    fn lex_string(&mut self, line: u32) -> Result<String, BicepError> {
        self.bump();
        let mut value = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => return Err(Self::error(line, "unterminated string")),
                Some('\'') => return Ok(value),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(c @ ('\\' | '\'' | '$')) => c,
                        Some(c) => {
                            value.push('\\');
                            c
                        }
                        None => return Err(Self::error(line, "unterminated string")),
                    };
                    value.push(escaped);
                }
                Some('$') if self.peek() == Some('{') => {
                    value.push('$');
                    self.lex_interpolation(&mut value, line)?;
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// Copy a `${...}` interpolation verbatim, including nested strings and braces.
    fn lex_interpolation(&mut self, value: &mut String, line: u32) -> Result<(), BicepError> {
        let mut depth = 0usize;

        loop {
            let c = self
                .bump()
                .ok_or_else(|| Self::error(line, "unterminated string interpolation"))?;
            value.push(c);
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '\'' => loop {
                    let inner = self
                        .bump()
                        .ok_or_else(|| Self::error(line, "unterminated string interpolation"))?;
                    value.push(inner);
                    if inner == '\\' {
                        if let Some(escaped) = self.bump() {
                            value.push(escaped);
                        }
                    } else if inner == '\'' {
                        break;
                    }
                },
                _ => {}
            }
        }
    }

    fn lex_multiline_string(&mut self, line: u32) -> Result<String, BicepError> {
        self.pos += 3;
        // A newline directly after the opening quotes is not part of the value.
        if self.rest().starts_with("\r\n") {
            self.pos += 1;
        }
        if self.peek() == Some('\n') {
            self.bump();
        }

        let start = self.pos;
        loop {
            if self.rest().starts_with("'''") {
                let value = self.source[start..self.pos].to_owned();
                self.pos += 3;
                return Ok(value);
            }
            if self.bump().is_none() {
                return Err(Self::error(line, "unterminated multi-line string"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_owned())
    }

    fn string(s: &str) -> TokenKind {
        TokenKind::String(s.to_owned())
    }

    #[test]
    fn test_param_declaration() {
        assert_eq!(
            kinds("param image string = 'nginx:alpine'"),
            vec![
                ident("param"),
                ident("image"),
                ident("string"),
                TokenKind::Symbol("="),
                string("nginx:alpine"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_newlines_are_tokens() {
        assert_eq!(
            kinds("a\nb"),
            vec![ident("a"), TokenKind::Newline, ident("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_line_numbers() {
        let tokens = tokenize("a\n\n  b").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[3].line, 3);
        assert_eq!(tokens[3].kind, ident("b"));
    }

    #[test]
    fn test_spans() {
        let source = "foo.bar";
        let tokens = tokenize(source).unwrap();
        assert_eq!(&source[tokens[0].start..tokens[0].end], "foo");
        assert_eq!(&source[tokens[2].start..tokens[2].end], "bar");
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // trailing\nb /* inline */ c"),
            vec![
                ident("a"),
                TokenKind::Newline,
                ident("b"),
                ident("c"),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_multiline_block_comment_emits_newline() {
        assert_eq!(
            kinds("a /* one\ntwo */ b"),
            vec![ident("a"), TokenKind::Newline, ident("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(kinds(r"'it\'s'")[0], string("it's"));
        assert_eq!(kinds(r"'a\nb'")[0], string("a\nb"));
        assert_eq!(kinds(r"'\${x}'")[0], string("${x}"));
    }

    #[test]
    fn test_string_interpolation_kept_verbatim() {
        assert_eq!(
            kinds("'${appName}-${toLower('X}')}'")[0],
            string("${appName}-${toLower('X}')}")
        );
    }

    #[test]
    fn test_multiline_string() {
        assert_eq!(kinds("'''\nline1\nline2'''")[0], string("line1\nline2"));
    }

    #[test]
    fn test_compound_symbols() {
        assert_eq!(
            kinds("a == b ?? c"),
            vec![
                ident("a"),
                TokenKind::Symbol("=="),
                ident("b"),
                TokenKind::Symbol("??"),
                ident("c"),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_number() {
        assert_eq!(kinds("containerPort: 3000")[2], TokenKind::Number(3000));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x = 'oops\ny").unwrap_err();
        assert!(matches!(err, BicepError::Lex { line: 1, .. }));
        assert!(err.to_string().contains("unterminated string"));
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(tokenize("/* never closed").is_err());
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a # b").unwrap_err();
        assert!(err.to_string().contains("unexpected character '#'"));
    }
}
