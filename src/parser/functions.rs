//! Function signatures and typedefs, including the function-pointer
//! typedef form `typedef RET (*name)(T, ...);`.

use super::{Parser, types};
use crate::diagnostic::SyntaxError;
use crate::doc::DocComment;
use crate::lexer::{KeywordKind, TokenKind};
use crate::model::{Declaration, FunctionDecl, Namespace, Param, TypeRef, TypedefDecl};
use thin_vec::ThinVec;

pub(super) fn parse_typedef(parser: &mut Parser) -> Result<Declaration, SyntaxError> {
    let doc = parser.leading_doc();
    let start = parser.expect(TokenKind::Keyword(KeywordKind::Typedef))?;
    let ty = types::parse_type_spec(parser)?;

    // `typedef RET (*name)(params);` declares a function-pointer alias;
    // otherwise it is a plain alias `typedef TYPE name;`.
    let (name, name_span, ty) = if parser.is_token(&TokenKind::LeftParen) {
        parser.expect(TokenKind::LeftParen)?;
        parser.expect(TokenKind::Star)?;
        let (name, name_span) = parser.expect_name()?;
        parser.expect(TokenKind::RightParen)?;

        parser.expect(TokenKind::LeftParen)?;
        let mut params: ThinVec<TypeRef> = ThinVec::new();
        if !parser.is_token(&TokenKind::RightParen) && !is_bare_void(parser) {
            loop {
                let param_ty = types::parse_type_spec(parser)?;
                parser.maybe_name();
                params.push(param_ty);
                if parser.accept(TokenKind::Comma).is_none() {
                    break;
                }
            }
        } else if is_bare_void(parser) {
            parser.advance();
        }
        parser.expect(TokenKind::RightParen)?;

        let fn_ptr = TypeRef::FunctionPointer {
            ret: Box::new(ty),
            params,
        };
        (name, name_span, fn_ptr)
    } else {
        let (name, name_span) = parser.expect_name()?;
        (name, name_span, ty)
    };
    let end = parser.expect(TokenKind::Semicolon)?;

    let span = start.merge(end);
    parser.declare(Namespace::Typedef, &name, name_span);
    Ok(Declaration::Typedef(TypedefDecl {
        name,
        ty,
        doc,
        span,
    }))
}

pub(super) fn parse_function(parser: &mut Parser) -> Result<Declaration, SyntaxError> {
    let doc = parser.leading_doc();
    let start = parser.current().span;
    let ret = types::parse_type_spec(parser)?;
    let (name, name_span) = parser.expect_name()?;

    parser.expect(TokenKind::LeftParen)?;
    let mut params: ThinVec<Param> = ThinVec::new();
    if is_bare_void(parser) {
        parser.advance();
    } else if !parser.is_token(&TokenKind::RightParen) {
        loop {
            let param_start = parser.current().span;
            let ty = types::parse_type_spec(parser)?;
            let param_name = parser.maybe_name();
            let span = match &param_name {
                Some((_, name_span)) => param_start.merge(*name_span),
                None => param_start,
            };
            params.push(Param {
                name: param_name.map(|(n, _)| n),
                ty,
                doc: None,
                span,
            });
            if parser.accept(TokenKind::Comma).is_none() {
                break;
            }
        }
    }
    parser.expect(TokenKind::RightParen)?;
    let end = parser.expect(TokenKind::Semicolon)?;

    // `@param` descriptions from the signature doc flow down to the
    // matching parameter node.
    if let Some(doc) = &doc {
        for param in params.iter_mut() {
            if let Some(name) = &param.name
                && let Some(tag) = doc.params.iter().find(|p| &p.name == name)
            {
                param.doc = Some(DocComment {
                    brief: tag.text.clone(),
                    ..Default::default()
                });
            }
        }
    }

    let span = start.merge(end);
    parser.declare(Namespace::Function, &name, name_span);
    Ok(Declaration::Function(FunctionDecl {
        name,
        ret,
        params,
        doc,
        span,
    }))
}

/// True for a lone `void` parameter list, `(void)`.
fn is_bare_void(parser: &Parser) -> bool {
    parser.is_token(&TokenKind::Keyword(KeywordKind::Void))
        && matches!(parser.peek_kind(1), TokenKind::RightParen)
}
