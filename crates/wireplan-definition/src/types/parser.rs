//! Recursive-descent parsing of declaration tokens into a [`DeclaredType`].
//!
//! Grammar:
//!
//! ```text
//! declaration  := '?' name | union
//! union        := intersection ('|' intersection)*
//! intersection := primary ('&' primary)*
//! primary      := name | '(' union ')'
//! ```

use wireplan_common::error::{Result, WireplanError};

use super::lexer::Token;
use super::{DeclaredType, TypeFactory};

struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    const fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

fn parse_err(message: String) -> WireplanError {
    WireplanError::InvalidType { message }
}

/// Parses a complete token stream.
pub(super) fn parse(tokens: &[Token], types: &mut TypeFactory) -> Result<DeclaredType> {
    let mut cursor = TokenCursor::new(tokens);

    let declared = if cursor.eat(&Token::Question) {
        let ty = parse_name(&mut cursor, types)?;
        if ty.name() == "null" || ty.name() == "mixed" {
            return Err(parse_err(format!("type \"{ty}\" cannot be marked nullable")));
        }
        DeclaredType::Union(types.nullable(ty))
    } else {
        parse_union(&mut cursor, types)?
    };

    if !cursor.at_end() {
        return Err(parse_err(format!(
            "unexpected trailing token {:?}",
            cursor.peek()
        )));
    }
    Ok(declared)
}

fn parse_union(cursor: &mut TokenCursor<'_>, types: &mut TypeFactory) -> Result<DeclaredType> {
    let mut members = vec![parse_intersection(cursor, types)?];
    while cursor.eat(&Token::Pipe) {
        members.push(parse_intersection(cursor, types)?);
    }
    collapse(members, types, true)
}

fn parse_intersection(
    cursor: &mut TokenCursor<'_>,
    types: &mut TypeFactory,
) -> Result<DeclaredType> {
    let mut members = vec![parse_primary(cursor, types)?];
    while cursor.eat(&Token::Amp) {
        members.push(parse_primary(cursor, types)?);
    }
    collapse(members, types, false)
}

fn parse_primary(cursor: &mut TokenCursor<'_>, types: &mut TypeFactory) -> Result<DeclaredType> {
    if cursor.eat(&Token::ParenOpen) {
        let inner = parse_union(cursor, types)?;
        if !cursor.eat(&Token::ParenClose) {
            return Err(parse_err(format!(
                "expected ')', got {:?}",
                cursor.peek()
            )));
        }
        return Ok(inner);
    }
    Ok(DeclaredType::Single(parse_name(cursor, types)?))
}

fn parse_name(cursor: &mut TokenCursor<'_>, types: &mut TypeFactory) -> Result<super::Type> {
    match cursor.advance() {
        Some(Token::Name(name)) => {
            let name = name.clone();
            types.class(&name)
        }
        other => Err(parse_err(format!("expected type name, got {other:?}"))),
    }
}

fn collapse(
    mut members: Vec<DeclaredType>,
    types: &TypeFactory,
    union: bool,
) -> Result<DeclaredType> {
    if members.len() == 1 {
        return members
            .pop()
            .ok_or_else(|| parse_err("empty type group".into()));
    }
    if union {
        Ok(DeclaredType::Union(types.union(members)?))
    } else {
        Ok(DeclaredType::Intersect(types.intersect(members)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{DeclaredType, TypeFactory};

    fn parse(types: &mut TypeFactory, input: &str) -> DeclaredType {
        types.from_declaration(Some(input)).expect("should parse")
    }

    #[test]
    fn parse_single_class() {
        let mut types = TypeFactory::new();
        let declared = parse(&mut types, "App\\Mailer");
        let mailer = types.class("App\\Mailer").expect("class");
        assert!(declared.as_single().expect("single").ptr_eq(&mailer));
    }

    #[test]
    fn parse_nullable_becomes_union_with_null() {
        let mut types = TypeFactory::new();
        let declared = parse(&mut types, "?string");
        let expected = DeclaredType::Union(types.nullable(types.string()));
        assert_eq!(declared, expected);
        assert_eq!(declared.name(), "string|null");
    }

    #[test]
    fn parse_union_matches_reordered_union() {
        let mut types = TypeFactory::new();
        assert_eq!(parse(&mut types, "int|string"), parse(&mut types, "string|int"));
    }

    #[test]
    fn parse_intersection() {
        let mut types = TypeFactory::new();
        let declared = parse(&mut types, "Countable&Traversable");
        assert!(matches!(declared, DeclaredType::Intersect(_)));
        assert_eq!(declared.name(), "Countable&Traversable");
    }

    #[test]
    fn parse_disjunctive_normal_form() {
        let mut types = TypeFactory::new();
        let declared = parse(&mut types, "(A&B)|null");
        let DeclaredType::Union(union) = &declared else {
            panic!("expected union, got {declared:?}");
        };
        assert_eq!(union.types().len(), 2);
        assert_eq!(declared.name(), "(A&B)|null");
        assert!(declared.is_nullable());
    }

    #[test]
    fn parse_union_nested_in_intersection() {
        let mut types = TypeFactory::new();
        let declared = parse(&mut types, "A&(B|C)");
        assert_eq!(declared.name(), "A&(B|C)");
    }

    #[test]
    fn parse_redundant_parentheses_collapse() {
        let mut types = TypeFactory::new();
        assert_eq!(parse(&mut types, "(int)").name(), "int");
    }

    #[test]
    fn parse_errors() {
        let mut types = TypeFactory::new();
        for input in ["int|", "?", "(A&B", "A B", "?null", "?int|string", "|int"] {
            assert!(
                types.from_declaration(Some(input)).is_err(),
                "expected error for {input:?}"
            );
        }
    }
}
