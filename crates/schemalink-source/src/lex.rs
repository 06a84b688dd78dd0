//! Go lexer.
//!
//! Lexes the subset of Go needed to recover type declarations from generated
//! model files. Newlines are kept as tokens because Go terminates struct
//! fields with them (automatic semicolon insertion); comments are dropped.
//! Anything the declaration parser never looks at (operators, numbers, rune
//! literals) is still lexed so that function bodies can be skipped safely.

use derive_more::Display;
use thiserror::Error as ThisError;

///
/// LexError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
#[error("line {line}: {message}")]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

impl LexError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

///
/// Keyword
/// Go keywords the declaration parser cares about.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[remain::sorted]
pub enum Keyword {
    #[display("chan")]
    Chan,
    #[display("const")]
    Const,
    #[display("func")]
    Func,
    #[display("import")]
    Import,
    #[display("interface")]
    Interface,
    #[display("map")]
    Map,
    #[display("package")]
    Package,
    #[display("struct")]
    Struct,
    #[display("type")]
    Type,
    #[display("var")]
    Var,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        let kw = match word {
            "chan" => Self::Chan,
            "const" => Self::Const,
            "func" => Self::Func,
            "import" => Self::Import,
            "interface" => Self::Interface,
            "map" => Self::Map,
            "package" => Self::Package,
            "struct" => Self::Struct,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        };

        Some(kw)
    }
}

///
/// Token
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    Ident(String),
    /// Interpreted or raw string literal, without quotes.
    String(String),
    Number(String),
    Rune(String),
    Op(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Star,
    Dot,
    Comma,
    Semicolon,
    Newline,
}

impl Token {
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Keyword(kw) => format!("keyword '{kw}'"),
            Self::Ident(s) => format!("identifier '{s}'"),
            Self::String(_) => "string literal".to_string(),
            Self::Number(s) => format!("number '{s}'"),
            Self::Rune(_) => "rune literal".to_string(),
            Self::Op(s) => format!("operator '{s}'"),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::Star => "'*'".to_string(),
            Self::Dot => "'.'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Semicolon => "';'".to_string(),
            Self::Newline => "newline".to_string(),
        }
    }

    #[must_use]
    pub const fn is_terminator(&self) -> bool {
        matches!(self, Self::Newline | Self::Semicolon)
    }
}

///
/// Spanned
/// A token and the 1-based line it starts on.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

///
/// Cursor
///

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    const fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
        }

        Some(ch)
    }

    fn consume(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }

        &self.src[start..self.pos]
    }
}

/// Lex Go source into spanned tokens.
///
/// Consecutive newlines collapse into a single [`Token::Newline`].
pub fn lex(src: &str) -> Result<Vec<Spanned>, LexError> {
    let buf = &mut Cursor::new(src);
    let mut tokens: Vec<Spanned> = Vec::new();

    loop {
        let line = buf.line;
        let Some(ch) = buf.bump() else {
            break;
        };
        let token = match ch {
            '\n' => Token::Newline,
            _ if ch.is_whitespace() => continue,
            '/' if buf.consume('/') => {
                buf.take_while(|c| c != '\n');
                continue;
            }
            '/' if buf.consume('*') => {
                if lex_block_comment(buf)? > line {
                    Token::Newline
                } else {
                    continue;
                }
            }
            '"' => Token::String(lex_string(buf, line)?),
            '`' => Token::String(lex_raw_string(buf, line)?),
            '\'' => Token::Rune(lex_rune(buf, line)?),
            'A'..='Z' | 'a'..='z' | '_' | '\u{80}'..=char::MAX => lex_word(buf, ch),
            '0'..='9' => lex_number(buf, ch),
            '.' if matches!(buf.peek(), Some('0'..='9')) => lex_number(buf, ch),
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            '*' => Token::Star,
            '.' => Token::Dot,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            #[rustfmt::skip]
            '+'|'-'|'/'|'%'|'&'|'|'|'^'|'<'|'>'|'='|'!'|':'|'~' => lex_op(buf, ch),
            _ => return Err(LexError::new(line, format!("unexpected character '{ch}'"))),
        };

        if token == Token::Newline
            && tokens
                .last()
                .is_none_or(|prev| prev.token == Token::Newline)
        {
            continue;
        }

        tokens.push(Spanned { token, line });
    }

    Ok(tokens)
}

// lex_block_comment
// returns the line the comment ends on
fn lex_block_comment(buf: &mut Cursor) -> Result<usize, LexError> {
    let start = buf.line;
    while let Some(ch) = buf.bump() {
        if ch == '*' && buf.consume('/') {
            return Ok(buf.line);
        }
    }

    Err(LexError::new(start, "unterminated block comment"))
}

fn lex_string(buf: &mut Cursor, line: usize) -> Result<String, LexError> {
    let mut s = String::new();
    loop {
        match buf.bump() {
            Some('"') => return Ok(s),
            Some('\\') => match buf.bump() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some('r') => s.push('\r'),
                Some(c @ ('"' | '\\' | '\'')) => s.push(c),
                Some(c) => {
                    s.push('\\');
                    s.push(c);
                }
                None => break,
            },
            Some('\n') | None => break,
            Some(c) => s.push(c),
        }
    }

    Err(LexError::new(line, "unterminated string literal"))
}

fn lex_raw_string(buf: &mut Cursor, line: usize) -> Result<String, LexError> {
    let s = buf.take_while(|c| c != '`').to_string();
    if buf.consume('`') {
        Ok(s)
    } else {
        Err(LexError::new(line, "unterminated raw string literal"))
    }
}

fn lex_rune(buf: &mut Cursor, line: usize) -> Result<String, LexError> {
    let mut s = String::new();
    loop {
        match buf.bump() {
            Some('\'') => return Ok(s),
            Some('\\') => {
                s.push('\\');
                if let Some(c) = buf.bump() {
                    s.push(c);
                }
            }
            Some('\n') | None => break,
            Some(c) => s.push(c),
        }
    }

    Err(LexError::new(line, "unterminated rune literal"))
}

fn lex_word(buf: &mut Cursor, first: char) -> Token {
    let rest = buf.take_while(|c| c.is_alphanumeric() || c == '_');
    let word = format!("{first}{rest}");

    match Keyword::from_word(&word) {
        Some(kw) => Token::Keyword(kw),
        None => Token::Ident(word),
    }
}

fn lex_number(buf: &mut Cursor, first: char) -> Token {
    let rest = buf.take_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');

    Token::Number(format!("{first}{rest}"))
}

fn lex_op(buf: &mut Cursor, first: char) -> Token {
    let mut s = String::from(first);
    s.push_str(buf.take_while(|c| {
        matches!(
            c,
            '+' | '-' | '%' | '&' | '|' | '^' | '<' | '>' | '=' | '!' | ':' | '~'
        )
    }));

    Token::Op(s)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn lexes_a_struct_field_with_tag() {
        let tokens = kinds("ID int `boil:\"id\" json:\"id\"`\n");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("ID".into()),
                Token::Ident("int".into()),
                Token::String("boil:\"id\" json:\"id\"".into()),
                Token::Newline,
            ]
        );
    }

    #[test]
    fn collapses_blank_lines_and_drops_comments() {
        let tokens = kinds("type\n\n// comment\n\nstruct /* inline */ {}");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Type),
                Token::Newline,
                Token::Keyword(Keyword::Struct),
                Token::LBrace,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn multiline_block_comment_acts_as_newline() {
        let tokens = kinds("a /* x\n y */ b");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("a".into()),
                Token::Newline,
                Token::Ident("b".into()),
            ]
        );
    }

    #[test]
    fn lexes_pointers_slices_and_selectors() {
        let tokens = kinds("[]*null.String");
        assert_eq!(
            tokens,
            vec![
                Token::LBracket,
                Token::RBracket,
                Token::Star,
                Token::Ident("null".into()),
                Token::Dot,
                Token::Ident("String".into()),
            ]
        );
    }

    #[test]
    fn tracks_lines() {
        let spanned = lex("a\nb\n\nc").unwrap();
        let lines: Vec<_> = spanned.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![1, 1, 2, 2, 4]);
    }

    #[test]
    fn operators_and_runes_do_not_confuse_the_lexer() {
        let tokens = kinds("x := '}' != \"{\"");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("x".into()),
                Token::Op(":=".into()),
                Token::Rune("}".into()),
                Token::Op("!=".into()),
                Token::String("{".into()),
            ]
        );
    }

    #[test]
    fn rejects_unterminated_literals() {
        assert!(lex("\"abc").is_err());
        assert!(lex("`abc").is_err());
        assert!(lex("/* abc").is_err());
    }
}
