//! Type-declaration parser for generated Go model files.
//!
//! Only top-level `type` declarations are parsed; everything else (imports,
//! vars, consts, function bodies) is skipped by brace depth. Struct fields
//! keep their declared type expression, which the scanner later folds into a
//! [`DeclaredType`].

use crate::lex::{Keyword, LexError, Spanned, Token, lex};
use serde::Serialize;
use std::fmt::{self, Display};
use thiserror::Error as ThisError;

///
/// ParseError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("line {line}: expected {expected}, found {found}")]
    Unexpected {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("unexpected end of file, expected {expected}")]
    Eof { expected: String },
}

///
/// TypeExpr
/// Syntactic shape of a Go type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeExpr {
    Named {
        package: Option<String>,
        name: String,
    },
    Pointer(Box<Self>),
    Slice(Box<Self>),
    Array(String, Box<Self>),
    Map(Box<Self>, Box<Self>),
    Chan(Box<Self>),
    Generic(Box<Self>),
    Func,
    Struct,
    Interface,
}

impl Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named {
                package: Some(package),
                name,
            } => write!(f, "{package}.{name}"),
            Self::Named {
                package: None,
                name,
            } => write!(f, "{name}"),
            Self::Pointer(inner) => write!(f, "*{inner}"),
            Self::Slice(inner) => write!(f, "[]{inner}"),
            Self::Array(len, inner) => write!(f, "[{len}]{inner}"),
            Self::Map(key, value) => write!(f, "map[{key}]{value}"),
            Self::Chan(inner) => write!(f, "chan {inner}"),
            Self::Generic(inner) => write!(f, "{inner}[...]"),
            Self::Func => write!(f, "func(...)"),
            Self::Struct => write!(f, "struct{{...}}"),
            Self::Interface => write!(f, "interface{{...}}"),
        }
    }
}

///
/// DeclaredType
///
/// The closed set of declared-type shapes the scanner understands. Anything
/// else is kept as `Unsupported` so the loss is explicit.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum DeclaredType {
    /// `*Name` or `*pkg.Name`; holds the referenced type.
    Pointer(String),
    /// `pkg.Name`
    Qualified { package: String, name: String },
    /// `Name`
    Ident(String),
    /// `[]Name` or `[]*Name`; holds the element type name.
    Slice(String),
    Unsupported(String),
}

impl DeclaredType {
    #[must_use]
    pub fn classify(expr: &TypeExpr) -> Self {
        match expr {
            TypeExpr::Named {
                package: Some(package),
                name,
            } => Self::Qualified {
                package: package.clone(),
                name: name.clone(),
            },
            TypeExpr::Named {
                package: None,
                name,
            } => Self::Ident(name.clone()),
            TypeExpr::Pointer(inner) => match inner.as_ref() {
                named @ TypeExpr::Named { .. } => Self::Pointer(named.to_string()),
                _ => Self::Unsupported(expr.to_string()),
            },
            TypeExpr::Slice(inner) => match inner.as_ref() {
                TypeExpr::Named {
                    package: None,
                    name,
                } => Self::Slice(name.clone()),
                TypeExpr::Pointer(elem) => match elem.as_ref() {
                    TypeExpr::Named {
                        package: None,
                        name,
                    } => Self::Slice(name.clone()),
                    _ => Self::Unsupported(expr.to_string()),
                },
                _ => Self::Unsupported(expr.to_string()),
            },
            _ => Self::Unsupported(expr.to_string()),
        }
    }

    /// Type token stored in the field table; `None` for unsupported shapes.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self {
            Self::Pointer(name) | Self::Ident(name) => Some(name.clone()),
            Self::Qualified { package, name } => Some(format!("{package}.{name}")),
            Self::Slice(name) => Some(format!("{name}Slice")),
            Self::Unsupported(_) => None,
        }
    }

    /// Whether the column can hold no value (pointer or `null.*` wrapper).
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Pointer(_) => true,
            Self::Qualified { package, .. } => package == "null",
            _ => false,
        }
    }
}

///
/// StructDecl
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub line: usize,
}

///
/// FieldDecl
/// A named struct field; embedded fields are not represented.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub tag: Option<String>,
    pub line: usize,
}

/// Parse every top-level struct declaration in a Go source file.
pub fn parse_file(src: &str) -> Result<Vec<StructDecl>, ParseError> {
    let tokens = lex(src)?;

    Parser::new(&tokens).parse_decls()
}

///
/// Parser
///

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Spanned]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn peek_nth(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + n).map(|s| &s.token)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |s| s.line)
    }

    fn bump(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        self.pos += 1;

        Some(token)
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::Unexpected {
                line: self.line(),
                expected: expected.to_string(),
                found: found.name(),
            },
            None => ParseError::Eof {
                expected: expected.to_string(),
            },
        }
    }

    fn expect(&mut self, token: &Token, expected: &str) -> Result<(), ParseError> {
        if self.consume(token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Ok(name.clone())
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn skip_terminators(&mut self) {
        while self.peek().is_some_and(Token::is_terminator) {
            self.pos += 1;
        }
    }

    // skip_balanced
    // consumes from an opening delimiter through its matching close
    fn skip_balanced(&mut self, open: &Token, close: &Token) -> Result<(), ParseError> {
        self.expect(open, &open.name())?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Some(t) if t == open => depth += 1,
                Some(t) if t == close => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(ParseError::Eof {
                        expected: close.name(),
                    });
                }
            }
        }

        Ok(())
    }

    fn parse_decls(&mut self) -> Result<Vec<StructDecl>, ParseError> {
        let mut decls = Vec::new();
        let mut depth = 0usize;

        while let Some(token) = self.peek() {
            match token {
                Token::Keyword(Keyword::Type) if depth == 0 => {
                    self.pos += 1;
                    self.parse_type_decl(&mut decls)?;
                }
                Token::LBrace => {
                    depth += 1;
                    self.pos += 1;
                }
                Token::RBrace => {
                    depth = depth.checked_sub(1).ok_or_else(|| self.unexpected("declaration"))?;
                    self.pos += 1;
                }
                _ => self.pos += 1,
            }
        }

        Ok(decls)
    }

    // parse_type_decl
    // `type Name T` or a grouped `type ( ... )` block
    fn parse_type_decl(&mut self, decls: &mut Vec<StructDecl>) -> Result<(), ParseError> {
        if self.consume(&Token::LParen) {
            loop {
                self.skip_terminators();
                if self.consume(&Token::RParen) {
                    return Ok(());
                }
                self.parse_type_spec(decls)?;
            }
        }

        self.parse_type_spec(decls)
    }

    fn parse_type_spec(&mut self, decls: &mut Vec<StructDecl>) -> Result<(), ParseError> {
        let line = self.line();
        let name = self.expect_ident()?;

        // generic type parameters: `type Page[T any] struct`
        if self.peek() == Some(&Token::LBracket)
            && matches!(self.peek_nth(1), Some(Token::Ident(_)))
            && !matches!(self.peek_nth(2), Some(Token::RBracket))
        {
            self.skip_balanced(&Token::LBracket, &Token::RBracket)?;
        }

        // alias: `type A = B`
        if self.peek() == Some(&Token::Op("=".to_string())) {
            self.pos += 1;
        }

        if self.peek() == Some(&Token::Keyword(Keyword::Struct)) {
            self.pos += 1;
            let fields = self.parse_struct_body()?;
            decls.push(StructDecl { name, fields, line });
        } else {
            self.parse_type()?;
        }

        Ok(())
    }

    fn parse_struct_body(&mut self) -> Result<Vec<FieldDecl>, ParseError> {
        self.expect(&Token::LBrace, "'{'")?;
        let mut fields = Vec::new();

        loop {
            self.skip_terminators();
            if self.consume(&Token::RBrace) {
                return Ok(fields);
            }

            self.parse_field_line(&mut fields)?;

            match self.peek() {
                Some(t) if t.is_terminator() => self.pos += 1,
                Some(Token::RBrace) => {}
                _ => return Err(self.unexpected("end of field")),
            }
        }
    }

    fn parse_field_line(&mut self, fields: &mut Vec<FieldDecl>) -> Result<(), ParseError> {
        let line = self.line();

        // embedded `*T` / `*pkg.T`
        if self.peek() == Some(&Token::Star) {
            self.parse_type()?;
            self.parse_tag();
            return Ok(());
        }

        let first = self.expect_ident()?;

        // embedded `T`, `pkg.T`, optionally tagged
        match self.peek() {
            Some(Token::Dot) => {
                self.pos += 1;
                self.expect_ident()?;
                self.parse_tag();
                return Ok(());
            }
            Some(Token::String(_) | Token::RBrace) | None => {
                self.parse_tag();
                return Ok(());
            }
            Some(t) if t.is_terminator() => return Ok(()),
            _ => {}
        }

        let mut names = vec![first];
        while self.consume(&Token::Comma) {
            names.push(self.expect_ident()?);
        }

        let ty = self.parse_type()?;
        let tag = self.parse_tag();

        fields.extend(names.into_iter().map(|name| FieldDecl {
            name,
            ty: ty.clone(),
            tag: tag.clone(),
            line,
        }));

        Ok(())
    }

    fn parse_tag(&mut self) -> Option<String> {
        match self.peek() {
            Some(Token::String(tag)) => {
                self.pos += 1;
                Some(tag.clone())
            }
            _ => None,
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        match self.peek() {
            Some(Token::Star) => {
                self.pos += 1;
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            Some(Token::LBracket) => {
                self.pos += 1;
                if self.consume(&Token::RBracket) {
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let mut len = String::new();
                while let Some(token) = self.bump() {
                    match token {
                        Token::RBracket => {
                            return Ok(TypeExpr::Array(len, Box::new(self.parse_type()?)));
                        }
                        Token::Number(n) | Token::Ident(n) | Token::Op(n) => len.push_str(n),
                        Token::Dot => len.push('.'),
                        _ => return Err(self.unexpected("array length")),
                    }
                }
                Err(ParseError::Eof {
                    expected: "']'".to_string(),
                })
            }
            Some(Token::LParen) => {
                self.pos += 1;
                let inner = self.parse_type()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Keyword(Keyword::Map)) => {
                self.pos += 1;
                self.expect(&Token::LBracket, "'['")?;
                let key = self.parse_type()?;
                self.expect(&Token::RBracket, "']'")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map(Box::new(key), Box::new(value)))
            }
            Some(Token::Keyword(Keyword::Chan)) => {
                self.pos += 1;
                if self.peek() == Some(&Token::Op("<-".to_string())) {
                    self.pos += 1;
                }
                Ok(TypeExpr::Chan(Box::new(self.parse_type()?)))
            }
            Some(Token::Op(op)) if op == "<-" => {
                self.pos += 1;
                self.expect(&Token::Keyword(Keyword::Chan), "'chan'")?;
                Ok(TypeExpr::Chan(Box::new(self.parse_type()?)))
            }
            Some(Token::Keyword(Keyword::Func)) => {
                self.pos += 1;
                self.skip_balanced(&Token::LParen, &Token::RParen)?;
                match self.peek() {
                    Some(Token::LParen) => self.skip_balanced(&Token::LParen, &Token::RParen)?,
                    Some(
                        Token::Ident(_)
                        | Token::Star
                        | Token::LBracket
                        | Token::Keyword(
                            Keyword::Map
                            | Keyword::Chan
                            | Keyword::Func
                            | Keyword::Struct
                            | Keyword::Interface,
                        ),
                    ) => {
                        self.parse_type()?;
                    }
                    _ => {}
                }
                Ok(TypeExpr::Func)
            }
            Some(Token::Keyword(Keyword::Struct)) => {
                self.pos += 1;
                self.skip_balanced(&Token::LBrace, &Token::RBrace)?;
                Ok(TypeExpr::Struct)
            }
            Some(Token::Keyword(Keyword::Interface)) => {
                self.pos += 1;
                self.skip_balanced(&Token::LBrace, &Token::RBrace)?;
                Ok(TypeExpr::Interface)
            }
            Some(Token::Ident(_)) => {
                let first = self.expect_ident()?;
                let named = if self.consume(&Token::Dot) {
                    TypeExpr::Named {
                        package: Some(first),
                        name: self.expect_ident()?,
                    }
                } else {
                    TypeExpr::Named {
                        package: None,
                        name: first,
                    }
                };

                if self.peek() == Some(&Token::LBracket) {
                    self.skip_balanced(&Token::LBracket, &Token::RBracket)?;
                    return Ok(TypeExpr::Generic(Box::new(named)));
                }

                Ok(named)
            }
            _ => Err(self.unexpected("type")),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const USER_MODEL: &str = r#"
package models

import (
	"time"

	"github.com/volatiletech/null/v8"
	"github.com/volatiletech/sqlboiler/v4/queries"
)

// User is an object representing the database table.
type User struct {
	ID             int         `boil:"id" json:"id" toml:"id" yaml:"id"`
	OrganizationID int         `boil:"organization_id" json:"organization_id"`
	Email          string      `boil:"email" json:"email"`
	Nickname       null.String `boil:"nickname" json:"nickname,omitempty"`
	CreatedAt      time.Time   `boil:"created_at" json:"created_at"`

	R *userR `boil:"-" json:"-" toml:"-" yaml:"-"`
	L userL  `boil:"-" json:"-" toml:"-" yaml:"-"`
}

var UserColumns = struct {
	ID string
}{
	ID: "id",
}

// userR is where relationships are stored.
type userR struct {
	Organization *Organization `boil:"Organization" json:"Organization" toml:"Organization" yaml:"Organization"`
	Posts        PostSlice     `boil:"Posts" json:"Posts" toml:"Posts" yaml:"Posts"`
}

// userL is where Load methods for each relationship are stored.
type userL struct{}

type (
	// UserSlice is an alias for a slice of pointers to User.
	UserSlice []*User
	// UserHook is the signature for custom User hook methods
	UserHook func(context.Context, boil.ContextExecutor, *User) error

	userQuery struct {
		*queries.Query
	}
)

func (o *User) Organization(mods ...qm.QueryMod) organizationQuery {
	type inner struct { X int }
	queryMods := []qm.QueryMod{
		qm.Where("\"id\" = ?", o.OrganizationID),
	}
	return Organizations(queryMods...)
}
"#;

    #[test]
    fn parses_generated_model_file() {
        let decls = parse_file(USER_MODEL).unwrap();
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["User", "userR", "userL", "userQuery"]);

        let user = &decls[0];
        let fields: Vec<_> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "ID",
                "OrganizationID",
                "Email",
                "Nickname",
                "CreatedAt",
                "R",
                "L"
            ]
        );
        assert_eq!(
            user.fields[0].tag.as_deref(),
            Some(r#"boil:"id" json:"id" toml:"id" yaml:"id""#)
        );

        // embedded `*queries.Query` is not a named field
        assert!(decls[3].fields.is_empty());
    }

    #[test]
    fn classifies_declared_shapes() {
        let decls = parse_file(USER_MODEL).unwrap();
        let user = &decls[0];
        let relations = &decls[1];

        let shapes: Vec<_> = user
            .fields
            .iter()
            .map(|f| DeclaredType::classify(&f.ty))
            .collect();
        assert_eq!(shapes[0], DeclaredType::Ident("int".into()));
        assert_eq!(
            shapes[3],
            DeclaredType::Qualified {
                package: "null".into(),
                name: "String".into()
            }
        );
        assert_eq!(shapes[5], DeclaredType::Pointer("userR".into()));

        let rel: Vec<_> = relations
            .fields
            .iter()
            .map(|f| DeclaredType::classify(&f.ty).token())
            .collect();
        assert_eq!(
            rel,
            vec![Some("Organization".into()), Some("PostSlice".into())]
        );
    }

    #[test]
    fn slices_of_named_types_fold_to_slice_tokens() {
        let decls = parse_file("type fooR struct {\n Tags []*Tag\n Raw []byte\n}").unwrap();
        let tokens: Vec<_> = decls[0]
            .fields
            .iter()
            .map(|f| DeclaredType::classify(&f.ty).token())
            .collect();
        assert_eq!(
            tokens,
            vec![Some("TagSlice".into()), Some("byteSlice".into())]
        );
    }

    #[test]
    fn unsupported_shapes_are_explicit() {
        let src = "type X struct {\n M map[string]int\n A [4]byte\n F func() error\n S struct{ Y int }\n P *[]int\n}";
        let decls = parse_file(src).unwrap();
        for field in &decls[0].fields {
            let shape = DeclaredType::classify(&field.ty);
            assert!(
                matches!(shape, DeclaredType::Unsupported(_)),
                "{} should be unsupported, got {shape:?}",
                field.name
            );
            assert_eq!(shape.token(), None);
        }
    }

    #[test]
    fn multiple_names_share_a_type() {
        let decls = parse_file("type P struct { X, Y float64 }").unwrap();
        let fields: Vec<_> = decls[0]
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.ty.to_string()))
            .collect();
        assert_eq!(
            fields,
            vec![("X", "float64".to_string()), ("Y", "float64".to_string())]
        );
    }

    #[test]
    fn nullable_shapes() {
        assert!(DeclaredType::Pointer("time.Time".into()).is_nullable());
        assert!(
            DeclaredType::Qualified {
                package: "null".into(),
                name: "Int".into()
            }
            .is_nullable()
        );
        assert!(!DeclaredType::Ident("int".into()).is_nullable());
    }

    #[test]
    fn malformed_struct_is_an_error() {
        let err = parse_file("type Broken struct {\n ID int int int\n").unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { .. }));
    }

    #[test]
    fn unbalanced_close_is_an_error() {
        assert!(parse_file("}").is_err());
    }
}
