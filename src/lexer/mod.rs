//! Character-level lexer and documentation-comment extractor.
//!
//! Produces the token stream plus a [`DocMap`] associating token positions
//! with documentation: a `/** ... */` block attaches to the token that
//! follows it, a `///< ...` comment attaches to the token before it on the
//! same line. Ordinary comments are discarded. Unterminated comments and
//! string literals are fatal for the file; everything else is reported to
//! the [`DiagnosticEngine`] and lexing continues.

mod token;

pub use token::{KeywordKind, Token, TokenKind};

use crate::diagnostic::{DiagnosticEngine, LexError, SyntaxError};
use crate::doc::DocComment;
use crate::source::{FileId, SourceFile, SourceLocation, SourceSpan};
use std::iter::Peekable;
use std::str::Chars;
use std::sync::OnceLock;

fn keyword_map() -> &'static hashbrown::HashMap<&'static str, KeywordKind> {
    static KEYWORDS: OnceLock<hashbrown::HashMap<&'static str, KeywordKind>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        let mut map = hashbrown::HashMap::new();
        map.insert("enum", KeywordKind::Enum);
        map.insert("struct", KeywordKind::Struct);
        map.insert("union", KeywordKind::Union);
        map.insert("typedef", KeywordKind::Typedef);
        map.insert("const", KeywordKind::Const);
        map.insert("volatile", KeywordKind::Volatile);
        map.insert("signed", KeywordKind::Signed);
        map.insert("unsigned", KeywordKind::Unsigned);
        map.insert("char", KeywordKind::Char);
        map.insert("short", KeywordKind::Short);
        map.insert("int", KeywordKind::Int);
        map.insert("long", KeywordKind::Long);
        map.insert("float", KeywordKind::Float);
        map.insert("double", KeywordKind::Double);
        map.insert("void", KeywordKind::Void);
        map.insert("bool", KeywordKind::Bool);
        map.insert("_Bool", KeywordKind::Bool);
        map
    })
}

/// Documentation comments keyed by token-stream position.
#[derive(Debug, Default)]
pub struct DocMap {
    leading: hashbrown::HashMap<usize, DocComment>,
    trailing: hashbrown::HashMap<usize, DocComment>,
}

impl DocMap {
    /// Doc block preceding the token at `index`.
    pub fn leading(&self, index: usize) -> Option<&DocComment> {
        self.leading.get(&index)
    }

    /// Trailing `///<` comment following the token at `index`.
    pub fn trailing(&self, index: usize) -> Option<&DocComment> {
        self.trailing.get(&index)
    }
}

/// Result of lexing one file.
#[derive(Debug)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub docs: DocMap,
}

/// Lexes a whole file. Recoverable problems land in `engine`; the `Err`
/// cases are the fatal ones of [`LexError`].
pub fn lex(file: &SourceFile, engine: &mut DiagnosticEngine) -> Result<LexOutput, LexError> {
    Lexer::new(&file.content, file.id).run(engine)
}

struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    file_id: FileId,
    offset: u32,
    tokens: Vec<Token>,
    docs: DocMap,
    pending_doc: Option<DocComment>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, file_id: FileId) -> Self {
        Lexer {
            input: input.chars().peekable(),
            file_id,
            offset: 0,
            tokens: Vec::new(),
            docs: DocMap::default(),
            pending_doc: None,
        }
    }

    fn run(mut self, engine: &mut DiagnosticEngine) -> Result<LexOutput, LexError> {
        while let Some(&c) = self.input.peek() {
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.bump();
                }
                '/' => self.scan_comment(engine)?,
                '#' => self.scan_directive(engine)?,
                '"' => {
                    let start = self.offset;
                    self.bump();
                    let text = self.scan_string_body(start)?;
                    self.push(TokenKind::String(text), start);
                }
                _ if c.is_alphabetic() || c == '_' => {
                    let start = self.offset;
                    let ident = self.scan_word();
                    match keyword_map().get(ident.as_str()) {
                        Some(&kw) => self.push(TokenKind::Keyword(kw), start),
                        None => self.push(TokenKind::Identifier(ident), start),
                    }
                }
                _ if c.is_ascii_digit() => {
                    let start = self.offset;
                    let (value, hex) = self.scan_number();
                    self.push(TokenKind::Integer { value, hex }, start);
                }
                _ => {
                    let start = self.offset;
                    self.bump();
                    let kind = match c {
                        '(' => Some(TokenKind::LeftParen),
                        ')' => Some(TokenKind::RightParen),
                        '{' => Some(TokenKind::LeftBrace),
                        '}' => Some(TokenKind::RightBrace),
                        ';' => Some(TokenKind::Semicolon),
                        ':' => Some(TokenKind::Colon),
                        ',' => Some(TokenKind::Comma),
                        '*' => Some(TokenKind::Star),
                        '=' => Some(TokenKind::Assign),
                        _ => None,
                    };
                    match kind {
                        Some(kind) => self.push(kind, start),
                        None => engine.report_syntax_error(SyntaxError::UnexpectedChar {
                            ch: c,
                            location: self.span(start),
                        }),
                    }
                }
            }
        }
        let end = self.offset;
        self.push(TokenKind::Eof, end);
        Ok(LexOutput {
            tokens: self.tokens,
            docs: self.docs,
        })
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.input.next()?;
        self.offset += c.len_utf8() as u32;
        Some(c)
    }

    fn span(&self, start: u32) -> SourceSpan {
        SourceSpan::new(
            SourceLocation::new(self.file_id, start),
            SourceLocation::new(self.file_id, self.offset),
        )
    }

    fn push(&mut self, kind: TokenKind, start: u32) {
        let span = self.span(start);
        self.push_with_span(kind, span);
    }

    fn push_with_span(&mut self, kind: TokenKind, span: SourceSpan) {
        if let Some(doc) = self.pending_doc.take() {
            self.docs.leading.insert(self.tokens.len(), doc);
        }
        self.tokens.push(Token::new(kind, span));
    }

    fn scan_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.input.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        word
    }

    fn scan_number(&mut self) -> (i64, bool) {
        let mut digits = String::new();
        let mut hex = false;
        while let Some(&c) = self.input.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else if (c == 'x' || c == 'X') && digits == "0" {
                hex = true;
                digits.clear();
                self.bump();
            } else if hex && c.is_ascii_hexdigit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let radix = if hex { 16 } else { 10 };
        let value = i64::from_str_radix(&digits, radix).unwrap_or(i64::MAX);
        (value, hex)
    }

    /// Scans a string body after the opening quote. A newline or the end
    /// of input before the closing quote is fatal.
    fn scan_string_body(&mut self, start: u32) -> Result<String, LexError> {
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\n') | None => {
                    return Err(LexError::UnterminatedString {
                        location: self.span(start),
                    });
                }
                Some('\\') => {
                    text.push('\\');
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
                Some(c) => text.push(c),
            }
        }
    }

    fn scan_comment(&mut self, engine: &mut DiagnosticEngine) -> Result<(), LexError> {
        let start = self.offset;
        self.bump(); // '/'
        match self.input.peek() {
            Some(&'/') => {
                self.bump();
                // `///<` binds to the previous token on the line
                if self.input.peek() == Some(&'/') {
                    self.bump();
                    if self.input.peek() == Some(&'<') {
                        self.bump();
                        let text = self.take_rest_of_line();
                        if !self.tokens.is_empty() {
                            let doc = DocComment::from_trailing(&text);
                            self.docs.trailing.insert(self.tokens.len() - 1, doc);
                        }
                        return Ok(());
                    }
                }
                self.take_rest_of_line();
                Ok(())
            }
            Some(&'*') => {
                self.bump();
                let is_doc = self.input.peek() == Some(&'*');
                let mut prev = if is_doc {
                    self.bump();
                    '*'
                } else {
                    '\0'
                };

                let mut body = String::new();
                loop {
                    match self.bump() {
                        None => {
                            return Err(LexError::UnterminatedComment {
                                location: self.span(start),
                            });
                        }
                        Some('/') if prev == '*' => {
                            body.pop();
                            break;
                        }
                        Some('*') if prev == '/' => {
                            engine.report_syntax_error(SyntaxError::NestedBlockComment {
                                location: self.span(start),
                            });
                            body.push('*');
                            prev = '*';
                        }
                        Some(c) => {
                            body.push(c);
                            prev = c;
                        }
                    }
                }

                if is_doc {
                    let doc = DocComment::from_block(&body);
                    if !doc.is_empty() {
                        self.pending_doc = Some(doc);
                    }
                }
                Ok(())
            }
            _ => {
                engine.report_syntax_error(SyntaxError::UnexpectedChar {
                    ch: '/',
                    location: self.span(start),
                });
                Ok(())
            }
        }
    }

    /// Handles a `#` directive. Only `#define` produces tokens; every
    /// other directive line is skipped.
    fn scan_directive(&mut self, engine: &mut DiagnosticEngine) -> Result<(), LexError> {
        let start = self.offset;
        self.bump(); // '#'
        self.skip_inline_ws();
        let directive = self.scan_word();
        if directive != "define" {
            self.take_rest_of_line();
            return Ok(());
        }
        let directive_span_end = self.offset;

        self.skip_inline_ws();
        let name_start = self.offset;
        let name = self.scan_word();
        if name.is_empty() {
            engine.report_syntax_error(SyntaxError::UnsupportedMacroValue {
                name: "#define".to_string(),
                location: self.span(start),
            });
            self.take_rest_of_line();
            return Ok(());
        }

        // A parameter list opens immediately after the name, no space.
        if self.input.peek() == Some(&'(') {
            engine.report_syntax_error(SyntaxError::ParameterizedMacro {
                name,
                location: self.span(start),
            });
            self.take_rest_of_line();
            return Ok(());
        }
        let name_span = self.span(name_start);

        self.skip_inline_ws();
        // some headers write `#define NAME = VALUE`; the `=` is noise
        if self.input.peek() == Some(&'=') {
            self.bump();
            self.skip_inline_ws();
        }
        let value_start = self.offset;
        let value = match self.input.peek() {
            Some(&'"') => {
                self.bump();
                let text = self.scan_string_body(value_start)?;
                TokenKind::String(text)
            }
            Some(c) if c.is_ascii_digit() => {
                let (value, hex) = self.scan_number();
                TokenKind::Integer { value, hex }
            }
            _ => {
                engine.report_syntax_error(SyntaxError::UnsupportedMacroValue {
                    name,
                    location: self.span(start),
                });
                self.take_rest_of_line();
                return Ok(());
            }
        };

        let directive_span = SourceSpan::new(
            SourceLocation::new(self.file_id, start),
            SourceLocation::new(self.file_id, directive_span_end),
        );
        self.push_with_span(TokenKind::DefineDirective, directive_span);
        self.push_with_span(TokenKind::Identifier(name), name_span);
        let value_span = self.span(value_start);
        self.push_with_span(value, value_span);
        Ok(())
    }

    fn skip_inline_ws(&mut self) {
        while let Some(&c) = self.input.peek() {
            if c == ' ' || c == '\t' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn take_rest_of_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(&c) = self.input.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        text
    }
}
