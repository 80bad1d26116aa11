//! Public-definitions header emitter (`lib<name>.h`).
//!
//! Re-renders every declaration in source order inside an include guard
//! and `extern "C"` fencing. Byte layout matters: tab indentation,
//! trailing `///<` member docs and the `};` close are all fixed, since
//! consumers diff the generated header.

use super::{CWriter, declare, guard_name, spelling};
use crate::model::{
    Declaration, EnumDecl, Field, FunctionDecl, MacroConstant, Module, RecordDecl, TypedefDecl,
};
use itertools::Itertools;

pub(super) fn render(module: &Module) -> String {
    let mut w = CWriter::new();
    let guard = guard_name(&module.name);

    w.line("/**");
    w.line(format!(" * Public definitions for the {} module", module.name));
    w.line(" *");
    w.line(" * NOTE: This file is auto-generated");
    w.line(" *");
    w.line(format!(" * @file lib{}.h", module.name));
    w.line(" */");
    w.line(format!("#ifndef {}", guard));
    w.line(format!("#define {}", guard));
    w.blank();
    w.line("#ifdef __cplusplus");
    w.line("extern \"C\" {");
    w.line("#endif");
    w.blank();
    w.line("#include <stdbool.h>");
    w.line("#include <stdint.h>");

    for decl in &module.declarations {
        w.blank();
        match decl {
            Declaration::Macro(m) => render_macro(&mut w, m),
            Declaration::Enum(e) => render_enum(&mut w, e),
            Declaration::Struct(r) | Declaration::Union(r) => render_record(&mut w, r),
            Declaration::Typedef(t) => render_typedef(&mut w, t),
            Declaration::Function(f) => render_function(&mut w, f),
        }
    }

    w.blank();
    w.line("#ifdef __cplusplus");
    w.line("}");
    w.line("#endif");
    w.blank();
    w.line(format!("#endif /* {} */", guard));
    w.finish()
}

fn render_macro(w: &mut CWriter, m: &MacroConstant) {
    let mut line = format!("#define {} {}", m.name, m.value);
    if let Some(doc) = &m.doc
        && !doc.brief.is_empty()
    {
        line.push_str(&format!(" ///< {}", doc.brief));
    }
    w.line(line);
}

fn render_enum(w: &mut CWriter, e: &EnumDecl) {
    w.doc_block(e.doc.as_ref(), Some(&format!("@enum {}", e.name)));
    w.line(format!("enum {} {{", e.name));
    for enumerator in &e.enumerators {
        let mut line = match enumerator.value {
            Some(value) => format!("\t{} = {},", enumerator.name, value),
            None => format!("\t{},", enumerator.name),
        };
        if let Some(doc) = &enumerator.doc
            && !doc.brief.is_empty()
        {
            line.push_str(&format!(" ///< {}", doc.brief));
        }
        w.line(line);
    }
    w.line("};");
}

fn render_record(w: &mut CWriter, r: &RecordDecl) {
    let tag = format!("@{} {}", r.kind.keyword(), r.name);
    w.doc_block(r.doc.as_ref(), Some(&tag));
    w.line(format!("{} {} {{", r.kind.keyword(), r.name));
    for field in &r.fields {
        w.line(field_line(field));
    }
    w.line("};");
}

fn field_line(field: &Field) -> String {
    let mut line = format!("\t{}", declare(&field.ty, &field.name));
    if let Some(bits) = field.bits {
        line.push_str(&format!(" : {}", bits));
    }
    line.push(';');
    if let Some(doc) = &field.doc
        && !doc.brief.is_empty()
    {
        line.push_str(&format!(" ///< {}", doc.brief));
    }
    line
}

fn render_typedef(w: &mut CWriter, t: &TypedefDecl) {
    w.doc_block(t.doc.as_ref(), None);
    w.line(format!("typedef {};", declare(&t.ty, &t.name)));
}

/// Return type on its own line, the way the rest of the emitted API
/// family is spelled.
fn render_function(w: &mut CWriter, f: &FunctionDecl) {
    w.doc_block(f.doc.as_ref(), None);
    w.line(spelling(&f.ret));
    let params = if f.params.is_empty() {
        "void".to_string()
    } else {
        f.params
            .iter()
            .map(|p| match &p.name {
                Some(name) => declare(&p.ty, name),
                None => spelling(&p.ty),
            })
            .join(", ")
    };
    w.line(format!("{}({});", f.name, params));
}
