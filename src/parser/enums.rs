//! enum parsing: tag, enumerator list with optional explicit values,
//! trailing commas and per-enumerator docs.

use super::Parser;
use crate::diagnostic::SyntaxError;
use crate::lexer::{KeywordKind, TokenKind};
use crate::model::{Declaration, EnumDecl, Enumerator, IntLiteral, Namespace};
use thin_vec::ThinVec;

pub(super) fn parse_enum_decl(parser: &mut Parser) -> Result<Declaration, SyntaxError> {
    let doc = parser.leading_doc();
    let start = parser.expect(TokenKind::Keyword(KeywordKind::Enum))?;

    if parser.is_token(&TokenKind::LeftBrace) {
        return Err(SyntaxError::AnonymousAggregate {
            keyword: "enum",
            location: start,
        });
    }
    let (name, name_span) = parser.expect_name()?;

    parser.expect(TokenKind::LeftBrace)?;
    let mut enumerators: ThinVec<Enumerator> = ThinVec::new();
    while !parser.is_token(&TokenKind::RightBrace) {
        enumerators.push(parse_enumerator(parser)?);
    }
    parser.expect(TokenKind::RightBrace)?;
    let end = parser.expect(TokenKind::Semicolon)?;

    let span = start.merge(end);
    parser.declare(Namespace::EnumTag, &name, name_span);
    Ok(Declaration::Enum(EnumDecl {
        name,
        enumerators,
        doc,
        span,
    }))
}

/// `IDENT (= INTEGER)? ,?`; the comma is optional on the last entry, and
/// a `///<` after the comma documents the enumerator on that line.
fn parse_enumerator(parser: &mut Parser) -> Result<Enumerator, SyntaxError> {
    let doc = parser.leading_doc();
    let (name, span) = parser.expect_name()?;

    let value = if parser.accept(TokenKind::Assign).is_some() {
        if let TokenKind::Integer { value, hex } = parser.current().kind {
            parser.advance();
            Some(IntLiteral { value, hex })
        } else {
            return Err(parser.unexpected("enumerator value"));
        }
    } else {
        None
    };

    if parser.accept(TokenKind::Comma).is_none() && !parser.is_token(&TokenKind::RightBrace) {
        return Err(parser.unexpected("',' or '}'"));
    }
    let doc = doc.or_else(|| parser.trailing_doc());

    Ok(Enumerator {
        name,
        value,
        doc,
        span,
    })
}
