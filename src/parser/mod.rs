//! Declaration parser.
//!
//! Consumes the token stream produced by the lexer, builds [`Declaration`]
//! nodes and maintains the per-namespace [`SymbolTable`] used later by the
//! validator. Syntax errors are reported to the [`DiagnosticEngine`] and
//! parsing resynchronises past the next top-level `;`, so every problem in
//! a file is reported in one run. No reference resolution happens here;
//! unknown type names stay as `Named` references for the validator.

mod enums;
mod functions;
mod records;
mod types;

use crate::diagnostic::{DiagnosticEngine, SemanticError, SyntaxError};
use crate::doc::DocComment;
use crate::lexer::{KeywordKind, LexOutput, Token, TokenKind};
use crate::model::{
    Declaration, IntLiteral, MacroConstant, MacroValue, Module, Namespace, SymbolTable,
};
use crate::source::SourceSpan;
use log::debug;

/// Result of parsing one file: the module plus the symbol table the
/// validator resolves names against.
pub struct ParseOutput {
    pub module: Module,
    pub symbols: SymbolTable,
}

/// Parses a lexed file into a [`Module`] named `module_name`.
pub fn parse(
    module_name: &str,
    lexed: LexOutput,
    engine: &mut DiagnosticEngine,
) -> ParseOutput {
    Parser::new(lexed, engine).parse_module(module_name)
}

pub(crate) struct Parser<'e> {
    tokens: Vec<Token>,
    docs: crate::lexer::DocMap,
    position: usize,
    engine: &'e mut DiagnosticEngine,
    symbols: SymbolTable,
}

impl<'e> Parser<'e> {
    fn new(lexed: LexOutput, engine: &'e mut DiagnosticEngine) -> Self {
        Parser {
            tokens: lexed.tokens,
            docs: lexed.docs,
            position: 0,
            engine,
            symbols: SymbolTable::new(),
        }
    }

    fn parse_module(mut self, module_name: &str) -> ParseOutput {
        let mut module = Module::new(module_name);

        while !self.is_token(&TokenKind::Eof) {
            match self.parse_declaration() {
                Ok(decl) => {
                    debug!("parsed declaration '{}'", decl.name());
                    module.declarations.push(decl);
                }
                Err(err) => {
                    self.engine.report_syntax_error(err);
                    self.recover();
                }
            }
        }

        ParseOutput {
            module,
            symbols: self.symbols,
        }
    }

    fn parse_declaration(&mut self) -> Result<Declaration, SyntaxError> {
        match &self.current().kind {
            TokenKind::DefineDirective => self.parse_macro_constant(),
            TokenKind::Keyword(KeywordKind::Typedef) => functions::parse_typedef(self),
            TokenKind::Keyword(KeywordKind::Enum) if self.brace_opens_body() => {
                enums::parse_enum_decl(self)
            }
            TokenKind::Keyword(KeywordKind::Struct | KeywordKind::Union)
                if self.brace_opens_body() =>
            {
                records::parse_record_decl(self)
            }
            TokenKind::Keyword(kw) if kw.is_type_specifier_start() => {
                functions::parse_function(self)
            }
            TokenKind::Identifier(_) => functions::parse_function(self),
            _ => Err(self.unexpected("declaration")),
        }
    }

    /// After `enum`/`struct`/`union`, a `{` (with or without a tag name in
    /// between) means a body follows; anything else is a type reference in
    /// a function signature.
    fn brace_opens_body(&self) -> bool {
        matches!(self.peek_kind(1), TokenKind::LeftBrace)
            || matches!(self.peek_kind(2), TokenKind::LeftBrace)
    }

    /// `#define NAME VALUE`. The lexer already rejected parameterized and
    /// non-literal defines, so the shape here is fixed.
    fn parse_macro_constant(&mut self) -> Result<Declaration, SyntaxError> {
        let doc = self.leading_doc();
        let start = self.current().span;
        self.advance();

        let (name, name_span) = self.expect_name()?;
        let value = match self.current().kind.clone() {
            TokenKind::Integer { value, hex } => MacroValue::Int(IntLiteral { value, hex }),
            TokenKind::String(s) => MacroValue::Str(s),
            _ => return Err(self.unexpected("macro value")),
        };
        self.advance();
        let doc = doc.or_else(|| self.trailing_doc());

        let span = start.merge(name_span);
        self.declare(Namespace::Macro, &name, span);
        Ok(Declaration::Macro(MacroConstant {
            name,
            value,
            doc,
            span,
        }))
    }

    // === token cursor ===

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_kind(&self, ahead: usize) -> &TokenKind {
        match self.tokens.get(self.position + ahead) {
            Some(tok) => &tok.kind,
            None => &TokenKind::Eof,
        }
    }

    /// Consumes the current token. The trailing `Eof` is never consumed.
    pub(crate) fn advance(&mut self) {
        if !matches!(self.current().kind, TokenKind::Eof) {
            self.position += 1;
        }
    }

    pub(crate) fn is_token(&self, kind: &TokenKind) -> bool {
        self.current().kind == *kind
    }

    /// Consumes the current token if it matches, returning its span.
    pub(crate) fn accept(&mut self, kind: TokenKind) -> Option<SourceSpan> {
        if self.is_token(&kind) {
            let span = self.current().span;
            self.advance();
            Some(span)
        } else {
            None
        }
    }

    pub(crate) fn accept_keyword(&mut self, kw: KeywordKind) -> bool {
        self.accept(TokenKind::Keyword(kw)).is_some()
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<SourceSpan, SyntaxError> {
        match self.accept(kind.clone()) {
            Some(span) => Ok(span),
            None => Err(self.unexpected(&format!("'{}'", kind))),
        }
    }

    /// Expects and consumes an identifier, returning name and span.
    pub(crate) fn expect_name(&mut self) -> Result<(String, SourceSpan), SyntaxError> {
        let token = self.current().clone();
        if let TokenKind::Identifier(name) = token.kind {
            self.advance();
            Ok((name, token.span))
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    /// Consumes an identifier if one is present.
    pub(crate) fn maybe_name(&mut self) -> Option<(String, SourceSpan)> {
        let token = self.current().clone();
        if let TokenKind::Identifier(name) = token.kind {
            self.advance();
            Some((name, token.span))
        } else {
            None
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> SyntaxError {
        let token = self.current();
        if matches!(token.kind, TokenKind::Eof) {
            SyntaxError::UnexpectedEof {
                location: token.span,
            }
        } else {
            SyntaxError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.clone(),
                location: token.span,
            }
        }
    }

    /// Skips past the next `;` at brace depth zero, so one bad declaration
    /// does not cascade into the rest of the file.
    fn recover(&mut self) {
        let mut depth: u32 = 0;
        loop {
            match &self.current().kind {
                TokenKind::Eof => break,
                TokenKind::LeftBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => self.advance(),
            }
        }
    }

    // === documentation lookup ===

    /// Doc block attached in front of the current token.
    pub(crate) fn leading_doc(&self) -> Option<DocComment> {
        self.docs.leading(self.position).cloned()
    }

    /// Trailing `///<` doc attached to the most recently consumed token.
    pub(crate) fn trailing_doc(&self) -> Option<DocComment> {
        if self.position == 0 {
            return None;
        }
        self.docs.trailing(self.position - 1).cloned()
    }

    // === symbol table ===

    /// Records a name, reporting a duplicate as a [`SemanticError`] at the
    /// second declaration site.
    pub(crate) fn declare(&mut self, ns: Namespace, name: &str, span: SourceSpan) {
        if self.symbols.declare(ns, name, span).is_some() {
            self.engine.report_semantic_error(SemanticError::DuplicateName {
                name: name.to_string(),
                namespace: ns.as_str(),
                location: span,
            });
        }
    }
}
