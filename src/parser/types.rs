//! Type-specifier parsing: primitive combinations, fixed-width names,
//! named type references and pointer declarators.

use super::Parser;
use crate::diagnostic::SyntaxError;
use crate::lexer::{KeywordKind, TokenKind};
use crate::model::{CharSign, FloatKind, Primitive, SysKind, TagHint, TypeRef};

/// Parses a type-spec including any trailing `*`s. Named references are
/// not resolved here; the validator checks them at end-of-file, which is
/// what makes forward references work.
pub(super) fn parse_type_spec(parser: &mut Parser) -> Result<TypeRef, SyntaxError> {
    let mut is_const = false;
    loop {
        if parser.accept_keyword(KeywordKind::Const) {
            is_const = true;
        } else if parser.accept_keyword(KeywordKind::Volatile) {
            // accepted, carries no meaning for the emitted artifacts
        } else {
            break;
        }
    }

    let base = parse_base_type(parser, is_const)?;

    let mut depth = 0u32;
    while parser.accept(TokenKind::Star).is_some() {
        depth += 1;
    }
    if depth > 0 {
        Ok(TypeRef::Pointer {
            inner: Box::new(base),
            depth,
        })
    } else {
        Ok(base)
    }
}

fn parse_base_type(parser: &mut Parser, is_const: bool) -> Result<TypeRef, SyntaxError> {
    let token = parser.current().clone();
    match token.kind {
        TokenKind::Keyword(kw) => match kw {
            KeywordKind::Struct | KeywordKind::Union | KeywordKind::Enum => {
                parser.advance();
                let hint = match kw {
                    KeywordKind::Struct => TagHint::Struct,
                    KeywordKind::Union => TagHint::Union,
                    _ => TagHint::Enum,
                };
                let (name, _) = parser.expect_name()?;
                Ok(TypeRef::Named {
                    name,
                    hint: Some(hint),
                    is_const,
                })
            }
            KeywordKind::Float => {
                parser.advance();
                Ok(TypeRef::Primitive {
                    prim: Primitive::Float(FloatKind::Float),
                    is_const,
                })
            }
            KeywordKind::Double => {
                parser.advance();
                Ok(TypeRef::Primitive {
                    prim: Primitive::Float(FloatKind::Double),
                    is_const,
                })
            }
            KeywordKind::Void => {
                parser.advance();
                Ok(TypeRef::Primitive {
                    prim: Primitive::Void,
                    is_const,
                })
            }
            KeywordKind::Bool => {
                parser.advance();
                Ok(TypeRef::Primitive {
                    prim: Primitive::Bool,
                    is_const,
                })
            }
            _ => parse_integer_combination(parser, is_const),
        },
        TokenKind::Identifier(name) => {
            parser.advance();
            match fixed_width(&name) {
                Some(prim) => Ok(TypeRef::Primitive { prim, is_const }),
                None => Ok(TypeRef::Named {
                    name,
                    hint: None,
                    is_const,
                }),
            }
        }
        _ => Err(parser.unexpected("type specifier")),
    }
}

/// Parses the multi-keyword integer spellings: `unsigned`, `signed char`,
/// `unsigned long long` and so on. A lone sign keyword means `int`.
fn parse_integer_combination(parser: &mut Parser, is_const: bool) -> Result<TypeRef, SyntaxError> {
    let mut sign: Option<bool> = None; // Some(true) = signed
    if parser.accept_keyword(KeywordKind::Signed) {
        sign = Some(true);
    } else if parser.accept_keyword(KeywordKind::Unsigned) {
        sign = Some(false);
    }

    let prim = if parser.accept_keyword(KeywordKind::Char) {
        let char_sign = match sign {
            None => CharSign::Plain,
            Some(true) => CharSign::Signed,
            Some(false) => CharSign::Unsigned,
        };
        Primitive::Char { sign: char_sign }
    } else {
        let signed = sign.unwrap_or(true);
        if parser.accept_keyword(KeywordKind::Short) {
            parser.accept_keyword(KeywordKind::Int);
            Primitive::SysInt {
                kind: SysKind::Short,
                signed,
            }
        } else if parser.accept_keyword(KeywordKind::Long) {
            let kind = if parser.accept_keyword(KeywordKind::Long) {
                SysKind::LongLong
            } else {
                SysKind::Long
            };
            parser.accept_keyword(KeywordKind::Int);
            Primitive::SysInt { kind, signed }
        } else if parser.accept_keyword(KeywordKind::Int) {
            Primitive::SysInt {
                kind: SysKind::Int,
                signed,
            }
        } else if sign.is_some() {
            // `signed x;` / `unsigned x;`
            Primitive::SysInt {
                kind: SysKind::Int,
                signed,
            }
        } else {
            return Err(parser.unexpected("type specifier"));
        }
    };

    Ok(TypeRef::Primitive { prim, is_const })
}

fn fixed_width(name: &str) -> Option<Primitive> {
    let (signed, width) = match name {
        "int8_t" => (true, 8),
        "int16_t" => (true, 16),
        "int32_t" => (true, 32),
        "int64_t" => (true, 64),
        "uint8_t" => (false, 8),
        "uint16_t" => (false, 16),
        "uint32_t" => (false, 32),
        "uint64_t" => (false, 64),
        _ => return None,
    };
    Some(Primitive::Fixed { width, signed })
}
