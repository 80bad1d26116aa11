//! The intermediate model built by the parser and consumed, read-only,
//! by the validator and the generator.
//!
//! A [`Module`] owns its declarations in source order; order is preserved
//! end-to-end because the emitted C requires definition before use and
//! downstream consumers diff generated output.

use crate::doc::DocComment;
use crate::source::SourceSpan;
use indexmap::IndexMap;
use std::fmt;
use thin_vec::ThinVec;

/// System-width integer kinds, distinct from the fixed-width ones so
/// their original spelling survives to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SysKind {
    Short,
    Int,
    Long,
    LongLong,
}

impl SysKind {
    pub fn bit_size(&self) -> u32 {
        match self {
            SysKind::Short => 16,
            SysKind::Int => 32,
            SysKind::Long => 64,
            SysKind::LongLong => 64,
        }
    }
}

/// `char` signedness is three-valued in C; plain `char` is its own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharSign {
    Plain,
    Signed,
    Unsigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatKind {
    Float,
    Double,
}

/// Leaf types with a fixed target spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// `int8_t`/`uint8_t` .. `int64_t`/`uint64_t`.
    Fixed { width: u32, signed: bool },
    /// `short`, `int`, `long`, `long long` and unsigned forms.
    SysInt { kind: SysKind, signed: bool },
    Char { sign: CharSign },
    Float(FloatKind),
    Bool,
    Void,
}

impl Primitive {
    /// Bit size for bit-field validation. Non-integer kinds have none.
    pub fn bit_size(&self) -> Option<u32> {
        match self {
            Primitive::Fixed { width, .. } => Some(*width),
            Primitive::SysInt { kind, .. } => Some(kind.bit_size()),
            Primitive::Char { .. } => Some(8),
            Primitive::Bool => Some(8),
            Primitive::Float(_) | Primitive::Void => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.bit_size().is_some()
    }

    /// The spelling used when re-rendering the type in C.
    pub fn c_spelling(&self) -> String {
        match self {
            Primitive::Fixed { width, signed } => {
                if *signed {
                    format!("int{}_t", width)
                } else {
                    format!("uint{}_t", width)
                }
            }
            Primitive::SysInt { kind, signed } => {
                let base = match kind {
                    SysKind::Short => "short",
                    SysKind::Int => "int",
                    SysKind::Long => "long",
                    SysKind::LongLong => "long long",
                };
                if *signed {
                    base.to_string()
                } else {
                    format!("unsigned {}", base)
                }
            }
            Primitive::Char { sign } => match sign {
                CharSign::Plain => "char".to_string(),
                CharSign::Signed => "signed char".to_string(),
                CharSign::Unsigned => "unsigned char".to_string(),
            },
            Primitive::Float(FloatKind::Float) => "float".to_string(),
            Primitive::Float(FloatKind::Double) => "double".to_string(),
            Primitive::Bool => "bool".to_string(),
            Primitive::Void => "void".to_string(),
        }
    }
}

/// Which tag namespace a keyworded type reference resolves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagHint {
    Struct,
    Union,
    Enum,
}

impl TagHint {
    pub fn keyword(&self) -> &'static str {
        match self {
            TagHint::Struct => "struct",
            TagHint::Union => "union",
            TagHint::Enum => "enum",
        }
    }
}

/// A reference to a type, as written in a field, parameter or typedef.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Primitive { prim: Primitive, is_const: bool },
    /// Reference to a declared type. A bare name resolves in the typedef
    /// namespace; a `struct`/`union`/`enum` keyword routes it to the
    /// matching tag namespace.
    Named {
        name: String,
        hint: Option<TagHint>,
        is_const: bool,
    },
    Pointer { inner: Box<TypeRef>, depth: u32 },
    FunctionPointer {
        ret: Box<TypeRef>,
        params: ThinVec<TypeRef>,
    },
}

impl TypeRef {
    pub fn primitive(prim: Primitive) -> Self {
        TypeRef::Primitive {
            prim,
            is_const: false,
        }
    }

    /// Bit size of the base type, for bit-field validation.
    pub fn bit_size(&self) -> Option<u32> {
        match self {
            TypeRef::Primitive { prim, .. } => prim.bit_size(),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, TypeRef::Primitive { prim, .. } if prim.is_integer())
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeRef::Pointer { .. })
    }
}

/// An integer literal that remembers whether it was spelled in hex, so
/// enumerator values and macro constants re-render in their original base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntLiteral {
    pub value: i64,
    pub hex: bool,
}

impl fmt::Display for IntLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.hex {
            write!(f, "{:#x}", self.value)
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// The literal value of an object-like `#define`.
#[derive(Debug, Clone, PartialEq)]
pub enum MacroValue {
    Int(IntLiteral),
    Str(String),
}

impl fmt::Display for MacroValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MacroValue::Int(lit) => write!(f, "{}", lit),
            MacroValue::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enumerator {
    pub name: String,
    /// Explicit value, if one was written. An omitted value is previous
    /// plus one, zero for the first; [`EnumDecl::resolved_values`] applies
    /// that rule.
    pub value: Option<IntLiteral>,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub enumerators: ThinVec<Enumerator>,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

impl EnumDecl {
    /// Enumerator values with the implicit previous-plus-one rule applied.
    pub fn resolved_values(&self) -> Vec<i64> {
        let mut values = Vec::with_capacity(self.enumerators.len());
        let mut next = 0i64;
        for e in &self.enumerators {
            let v = match e.value {
                Some(lit) => lit.value,
                None => next,
            };
            values.push(v);
            next = v + 1;
        }
        values
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    /// Bit-field width, legal only on integer-kind base types.
    pub bits: Option<u32>,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

/// Whether a record is a `struct` or a `union`; both share the
/// ordered-field-list shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Struct,
    Union,
}

impl RecordKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            RecordKind::Struct => "struct",
            RecordKind::Union => "union",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: String,
    pub kind: RecordKind,
    pub fields: ThinVec<Field>,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedefDecl {
    pub name: String,
    pub ty: TypeRef,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeRef,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub ret: TypeRef,
    pub params: ThinVec<Param>,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MacroConstant {
    pub name: String,
    pub value: MacroValue,
    pub doc: Option<DocComment>,
    pub span: SourceSpan,
}

/// One top-level declaration. Struct and union share [`RecordDecl`] but
/// stay separate variants so emitters can spell the right keyword without
/// re-inspecting the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Enum(EnumDecl),
    Struct(RecordDecl),
    Union(RecordDecl),
    Typedef(TypedefDecl),
    Function(FunctionDecl),
    Macro(MacroConstant),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Enum(d) => &d.name,
            Declaration::Struct(d) | Declaration::Union(d) => &d.name,
            Declaration::Typedef(d) => &d.name,
            Declaration::Function(d) => &d.name,
            Declaration::Macro(d) => &d.name,
        }
    }

    pub fn doc(&self) -> Option<&DocComment> {
        match self {
            Declaration::Enum(d) => d.doc.as_ref(),
            Declaration::Struct(d) | Declaration::Union(d) => d.doc.as_ref(),
            Declaration::Typedef(d) => d.doc.as_ref(),
            Declaration::Function(d) => d.doc.as_ref(),
            Declaration::Macro(d) => d.doc.as_ref(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Declaration::Enum(d) => d.span,
            Declaration::Struct(d) | Declaration::Union(d) => d.span,
            Declaration::Typedef(d) => d.span,
            Declaration::Function(d) => d.span,
            Declaration::Macro(d) => d.span,
        }
    }
}

/// A parsed translation unit. Built once per input file, immutable after
/// parsing, consumed read-only by the validator and the generator.
#[derive(Debug, Clone, Default)]
pub struct Module {
    /// Externally supplied module name; drives artifact names and the
    /// generated symbol prefix.
    pub name: String,
    pub declarations: Vec<Declaration>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            declarations: Vec::new(),
        }
    }
}

/// The independent name-resolution scopes, mirroring C's declaration
/// spaces. struct and union share one tag namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    EnumTag,
    RecordTag,
    Typedef,
    Function,
    Macro,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::EnumTag => "enum tag",
            Namespace::RecordTag => "struct/union tag",
            Namespace::Typedef => "typedef",
            Namespace::Function => "function",
            Namespace::Macro => "macro",
        }
    }
}

/// Per-namespace symbol table, insertion-ordered so that diagnostics and
/// any derived iteration stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    enum_tags: IndexMap<String, SourceSpan>,
    record_tags: IndexMap<String, SourceSpan>,
    typedefs: IndexMap<String, SourceSpan>,
    functions: IndexMap<String, SourceSpan>,
    macros: IndexMap<String, SourceSpan>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn space_mut(&mut self, ns: Namespace) -> &mut IndexMap<String, SourceSpan> {
        match ns {
            Namespace::EnumTag => &mut self.enum_tags,
            Namespace::RecordTag => &mut self.record_tags,
            Namespace::Typedef => &mut self.typedefs,
            Namespace::Function => &mut self.functions,
            Namespace::Macro => &mut self.macros,
        }
    }

    fn space(&self, ns: Namespace) -> &IndexMap<String, SourceSpan> {
        match ns {
            Namespace::EnumTag => &self.enum_tags,
            Namespace::RecordTag => &self.record_tags,
            Namespace::Typedef => &self.typedefs,
            Namespace::Function => &self.functions,
            Namespace::Macro => &self.macros,
        }
    }

    /// Records `name` in `ns`. Returns the span of the earlier declaration
    /// if the name is already taken there.
    pub fn declare(&mut self, ns: Namespace, name: &str, span: SourceSpan) -> Option<SourceSpan> {
        let space = self.space_mut(ns);
        match space.get(name) {
            Some(prev) => Some(*prev),
            None => {
                space.insert(name.to_string(), span);
                None
            }
        }
    }

    pub fn contains(&self, ns: Namespace, name: &str) -> bool {
        self.space(ns).contains_key(name)
    }
}
