//! struct/union parsing, including bit-fields and trailing member docs.

use super::{Parser, types};
use crate::diagnostic::SyntaxError;
use crate::lexer::{KeywordKind, TokenKind};
use crate::model::{Declaration, Field, Namespace, RecordDecl, RecordKind};
use thin_vec::ThinVec;

pub(super) fn parse_record_decl(parser: &mut Parser) -> Result<Declaration, SyntaxError> {
    let doc = parser.leading_doc();
    let start = parser.current().span;
    let kind = if parser.accept_keyword(KeywordKind::Struct) {
        RecordKind::Struct
    } else {
        parser.expect(TokenKind::Keyword(KeywordKind::Union))?;
        RecordKind::Union
    };

    // Untagged aggregates have no place in the model; a `{` straight after
    // the keyword is rejected rather than given a synthetic name.
    if parser.is_token(&TokenKind::LeftBrace) {
        return Err(SyntaxError::AnonymousAggregate {
            keyword: kind.keyword(),
            location: start,
        });
    }
    let (name, name_span) = parser.expect_name()?;

    parser.expect(TokenKind::LeftBrace)?;
    let mut fields: ThinVec<Field> = ThinVec::new();
    while !parser.is_token(&TokenKind::RightBrace) {
        parse_field_line(parser, &mut fields)?;
    }
    parser.expect(TokenKind::RightBrace)?;
    let end = parser.expect(TokenKind::Semicolon)?;

    let span = start.merge(end);
    parser.declare(Namespace::RecordTag, &name, name_span);
    let record = RecordDecl {
        name,
        kind,
        fields,
        doc,
        span,
    };
    Ok(match record.kind {
        RecordKind::Struct => Declaration::Struct(record),
        RecordKind::Union => Declaration::Union(record),
    })
}

/// One member line: `type-spec declarator (, declarator)* ;` where a
/// declarator is `IDENT (: INTEGER)?`. A trailing `///<` comment binds to
/// the last member declared on the line.
fn parse_field_line(parser: &mut Parser, fields: &mut ThinVec<Field>) -> Result<(), SyntaxError> {
    let doc = parser.leading_doc();
    let ty = types::parse_type_spec(parser)?;

    let first = fields.len();
    loop {
        let (name, name_span) = parser.expect_name()?;
        let bits = if parser.accept(TokenKind::Colon).is_some() {
            Some(expect_bit_width(parser)?)
        } else {
            None
        };
        fields.push(Field {
            name,
            ty: ty.clone(),
            bits,
            doc: None,
            span: name_span,
        });
        if parser.accept(TokenKind::Comma).is_none() {
            break;
        }
    }
    parser.expect(TokenKind::Semicolon)?;

    let trailing = parser.trailing_doc();
    if let Some(field) = fields.last_mut() {
        field.doc = trailing;
    }
    if let Some(field) = fields.get_mut(first)
        && field.doc.is_none()
    {
        field.doc = doc;
    }
    Ok(())
}

fn expect_bit_width(parser: &mut Parser) -> Result<u32, SyntaxError> {
    if let TokenKind::Integer { value, .. } = parser.current().kind {
        parser.advance();
        Ok(u32::try_from(value).unwrap_or(u32::MAX))
    } else {
        Err(parser.unexpected("bit-field width"))
    }
}
