use crate::source::SourceSpan;
use std::fmt;

/// Keywords recognized by the declaration grammar: the aggregate/enum
/// keywords, the primitive type words, and the qualifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeywordKind {
    Enum,
    Struct,
    Union,
    Typedef,
    Const,
    Volatile,
    Signed,
    Unsigned,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
    Bool,
}

impl KeywordKind {
    /// Check if the keyword can start a type specifier
    pub fn is_type_specifier_start(&self) -> bool {
        !matches!(self, KeywordKind::Typedef)
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            KeywordKind::Enum => "enum",
            KeywordKind::Struct => "struct",
            KeywordKind::Union => "union",
            KeywordKind::Typedef => "typedef",
            KeywordKind::Const => "const",
            KeywordKind::Volatile => "volatile",
            KeywordKind::Signed => "signed",
            KeywordKind::Unsigned => "unsigned",
            KeywordKind::Char => "char",
            KeywordKind::Short => "short",
            KeywordKind::Int => "int",
            KeywordKind::Long => "long",
            KeywordKind::Float => "float",
            KeywordKind::Double => "double",
            KeywordKind::Void => "void",
            KeywordKind::Bool => "bool",
        };
        write!(f, "{}", s)
    }
}

/// The kind of a token.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    /// An identifier.
    Identifier(String),
    /// A keyword.
    Keyword(KeywordKind),
    /// An integer literal; `hex` records the original spelling base.
    Integer { value: i64, hex: bool },
    /// A string literal (content without the quotes).
    String(String),
    /// A `#define` directive introducer at the start of a line.
    DefineDirective,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,
    Colon,
    Comma,
    Star,
    Assign,
    /// The end of the input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::Keyword(k) => write!(f, "{}", k),
            TokenKind::Integer { value, hex } => {
                if *hex {
                    write!(f, "{:#x}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::DefineDirective => write!(f, "#define"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Eof => write!(f, ""),
        }
    }
}

/// Token with source span for the parser
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Token { kind, span }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
