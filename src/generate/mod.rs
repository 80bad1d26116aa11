//! Code generation: a pure function from a validated [`Module`] and an
//! emitter [`Profile`] to one named text artifact.
//!
//! The profile set is closed: the public-definitions header, the
//! pretty-printer declarations header and the pretty-printer
//! implementation. Iteration follows declaration order everywhere, so
//! identical input yields byte-identical output.

mod defs;
mod pp;

use crate::diagnostic::DiagnosticEngine;
use crate::doc::DocComment;
use crate::model::{Declaration, EnumDecl, Module, RecordDecl, TypeRef, TypedefDecl};
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;

/// The closed set of emitter profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// `lib<name>.h`, the public-definitions header.
    Defs,
    /// `lib<name>_pp.h`, pretty-printer declarations.
    PpDecls,
    /// `<name>_pp.c`, pretty-printer implementation.
    PpImpl,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Defs, Profile::PpDecls, Profile::PpImpl];

    pub fn from_name(name: &str) -> Option<Profile> {
        match name {
            "defs" => Some(Profile::Defs),
            "pp-decls" => Some(Profile::PpDecls),
            "pp-impl" => Some(Profile::PpImpl),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Profile::Defs => "defs",
            Profile::PpDecls => "pp-decls",
            Profile::PpImpl => "pp-impl",
        }
    }

    /// Artifact file name for a module.
    pub fn artifact_name(&self, module: &str) -> String {
        match self {
            Profile::Defs => format!("lib{}.h", module),
            Profile::PpDecls => format!("lib{}_pp.h", module),
            Profile::PpImpl => format!("{}_pp.c", module),
        }
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub content: String,
}

/// Renders one artifact. Unsupported shapes are reported per declaration
/// and replaced by a marked placeholder; the rest of the module still
/// renders.
pub fn generate(module: &Module, profile: Profile, engine: &mut DiagnosticEngine) -> Artifact {
    debug!("generating {} for module '{}'", profile.name(), module.name);
    let index = TypeIndex::build(module);
    let content = match profile {
        Profile::Defs => defs::render(module),
        Profile::PpDecls => pp::render_decls(module),
        Profile::PpImpl => pp::render_impl(module, &index, engine),
    };
    Artifact {
        file_name: profile.artifact_name(&module.name),
        content,
    }
}

/// Declaration lookup by name, for typedef chasing and by-value
/// delegation during printer generation.
pub(crate) struct TypeIndex<'a> {
    pub(crate) records: IndexMap<&'a str, &'a RecordDecl>,
    pub(crate) enums: IndexMap<&'a str, &'a EnumDecl>,
    pub(crate) typedefs: IndexMap<&'a str, &'a TypedefDecl>,
}

impl<'a> TypeIndex<'a> {
    pub(crate) fn build(module: &'a Module) -> Self {
        let mut records = IndexMap::new();
        let mut enums = IndexMap::new();
        let mut typedefs = IndexMap::new();
        for decl in &module.declarations {
            match decl {
                Declaration::Struct(r) | Declaration::Union(r) => {
                    records.insert(r.name.as_str(), r);
                }
                Declaration::Enum(e) => {
                    enums.insert(e.name.as_str(), e);
                }
                Declaration::Typedef(t) => {
                    typedefs.insert(t.name.as_str(), t);
                }
                _ => {}
            }
        }
        TypeIndex {
            records,
            enums,
            typedefs,
        }
    }

    /// Follows typedef aliases down to the underlying type.
    pub(crate) fn resolve<'t>(&'t self, ty: &'t TypeRef) -> &'t TypeRef {
        let mut ty = ty;
        for _ in 0..32 {
            match ty {
                TypeRef::Named {
                    name, hint: None, ..
                } => match self.typedefs.get(name.as_str()) {
                    Some(typedef) => ty = &typedef.ty,
                    None => return ty,
                },
                _ => return ty,
            }
        }
        ty
    }
}

/// The C spelling of a type, without a declarator name.
pub(crate) fn spelling(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Primitive { prim, is_const } => {
            format!("{}{}", const_prefix(*is_const), prim.c_spelling())
        }
        TypeRef::Named {
            name,
            hint,
            is_const,
        } => match hint {
            Some(hint) => format!("{}{} {}", const_prefix(*is_const), hint.keyword(), name),
            None => format!("{}{}", const_prefix(*is_const), name),
        },
        TypeRef::Pointer { inner, depth } => {
            format!("{} {}", spelling(inner), "*".repeat(*depth as usize))
        }
        TypeRef::FunctionPointer { ret, params } => {
            format!("{} (*)({})", spelling(ret), param_list(params))
        }
    }
}

/// Renders `type name` the way C wants it: stars hug the name and
/// function pointers wrap it.
pub(crate) fn declare(ty: &TypeRef, name: &str) -> String {
    match ty {
        TypeRef::Pointer { inner, depth } => {
            format!("{} {}{}", spelling(inner), "*".repeat(*depth as usize), name)
        }
        TypeRef::FunctionPointer { ret, params } => {
            format!("{} (*{})({})", spelling(ret), name, param_list(params))
        }
        _ => format!("{} {}", spelling(ty), name),
    }
}

fn param_list(params: &[TypeRef]) -> String {
    if params.is_empty() {
        "void".to_string()
    } else {
        params.iter().map(spelling).join(", ")
    }
}

fn const_prefix(is_const: bool) -> &'static str {
    if is_const { "const " } else { "" }
}

/// Guard macro name for the definitions header.
pub(crate) fn guard_name(module: &str) -> String {
    format!("{}_H", module.to_uppercase())
}

/// Line-oriented output buffer with doc-comment rendering.
pub(crate) struct CWriter {
    out: String,
}

impl CWriter {
    pub(crate) fn new() -> Self {
        CWriter { out: String::new() }
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Re-renders a doc comment as a `/** ... */` block: brief, body
    /// paragraphs, `@param`s in original order, `@return`, then any extra
    /// tag line such as `@struct <name>`. No doc and no tag renders
    /// nothing.
    pub(crate) fn doc_block(&mut self, doc: Option<&DocComment>, tag: Option<&str>) {
        let mut sections: Vec<Vec<String>> = Vec::new();
        if let Some(doc) = doc {
            if !doc.brief.is_empty() {
                sections.push(vec![doc.brief.clone()]);
            }
            for paragraph in doc.body.split("\n\n").filter(|p| !p.is_empty()) {
                sections.push(paragraph.lines().map(str::to_string).collect());
            }
            if !doc.params.is_empty() {
                sections.push(
                    doc.params
                        .iter()
                        .map(|p| format!("@param {} {}", p.name, p.text))
                        .collect(),
                );
            }
            if let Some(ret) = &doc.ret {
                sections.push(vec![format!("@return {}", ret)]);
            }
        }
        if let Some(tag) = tag {
            sections.push(vec![tag.to_string()]);
        }
        if sections.is_empty() {
            return;
        }

        self.line("/**");
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                self.line(" *");
            }
            for text in section {
                self.line(format!(" * {}", text));
            }
        }
        self.line(" */");
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}
