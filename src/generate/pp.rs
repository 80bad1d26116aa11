//! Pretty-printer emitters: the declarations header (`lib<name>_pp.h`)
//! and the implementation (`<name>_pp.c`).
//!
//! Every struct and union gets a `<name>_fpr`/`<name>_pr` pair. The
//! implementation renders a YAML body per field from a fixed type-kind
//! to `fprintf` mapping; a field with no mapping is an unsupported shape:
//! the declaration is replaced by a marked placeholder, the error is
//! reported and the remaining declarations still render.

use super::{CWriter, TypeIndex, spelling};
use crate::diagnostic::{DiagnosticEngine, GenerationError};
use crate::model::{
    CharSign, Declaration, Field, Module, Primitive, RecordDecl, SysKind, TagHint, TypeRef,
};
use crate::printer::{PR_DEF, PR_JSON, PR_YAML};

pub(super) fn render_decls(module: &Module) -> String {
    let mut w = CWriter::new();

    w.line("/**");
    w.line(format!(
        " * Pretty-printers for the enums and structs of the {} module",
        module.name
    ));
    w.line(" *");
    w.line(" * NOTE: This file is auto-generated");
    w.line(" *");
    w.line(format!(" * @file lib{}_pp.h", module.name));
    w.line(" */");
    w.blank();
    render_flag_enum(&mut w, &module.name);

    for decl in &module.declarations {
        if let Declaration::Struct(r) | Declaration::Union(r) = decl {
            let obj = format!("const {} {} *obj", r.kind.keyword(), r.name);
            w.blank();
            w.line("/**");
            w.line(format!(
                " * Prints the given ::{} 'obj' to the given output 'stream'",
                r.name
            ));
            w.line(" *");
            w.line(" * @param stream output stream used for printing");
            w.line(format!(" * @param obj Pointer to the ::{} to print", r.name));
            w.line(" * @param flags Pretty-printer flags");
            w.line(" *");
            w.line(" * @return On success, the number of characters printed is returned.");
            w.line(" */");
            w.line("int");
            w.line(format!("{}_fpr(FILE *stream, {}, int flags);", r.name, obj));
            w.blank();
            w.line("/**");
            w.line(format!(" * Prints the given ::{} 'obj' to stdout", r.name));
            w.line(" *");
            w.line(format!(" * @param obj Pointer to the ::{} to print", r.name));
            w.line(" * @param flags Pretty-printer flags");
            w.line(" *");
            w.line(" * @return On success, the number of characters printed is returned.");
            w.line(" */");
            w.line("int");
            w.line(format!("{}_pr({}, int flags);", r.name, obj));
        }
    }

    w.finish()
}

/// The flag enum selecting the output format, `DEF` padded so the `=`
/// column lines up.
fn render_flag_enum(w: &mut CWriter, module: &str) {
    let prefix = module.to_uppercase();
    let names = [
        (format!("{}_PR_DEF", prefix), PR_DEF),
        (format!("{}_PR_YAML", prefix), PR_YAML),
        (format!("{}_PR_JSON", prefix), PR_JSON),
    ];
    let width = names.iter().map(|(n, _)| n.len()).max().unwrap_or(0);

    w.line("/**");
    w.line(" * Options for pretty-printer (``*_pr``, ``*_fpr``) functions");
    w.line(" *");
    w.line(" * Options determines the format the pretty-printer uses, e.g. Yaml or JSON");
    w.line(" *");
    w.line(format!(" * @enum {}_pr", module));
    w.line(" */");
    w.line(format!("enum {}_pr {{", module));
    for (name, value) in &names {
        w.line(format!("\t{:<width$} = {:#x},", name, value, width = width));
    }
    w.line("};");
}

pub(super) fn render_impl(
    module: &Module,
    index: &TypeIndex,
    engine: &mut DiagnosticEngine,
) -> String {
    let mut w = CWriter::new();
    let prefix = module.name.to_uppercase();

    w.line("/**");
    w.line(format!(
        " * Pretty-printer implementations for the {} module",
        module.name
    ));
    w.line(" *");
    w.line(" * NOTE: This file is auto-generated");
    w.line(" *");
    w.line(format!(" * @file {}_pp.c", module.name));
    w.line(" */");
    w.line("#include <inttypes.h>");
    w.line("#include <stdio.h>");
    w.line("#include <errno.h>");
    w.line(format!("#include <lib{}.h>", module.name));
    w.line(format!("#include <lib{}_pp.h>", module.name));

    for decl in &module.declarations {
        if let Declaration::Struct(r) | Declaration::Union(r) = decl {
            w.blank();
            match yaml_body(index, r) {
                Ok(lines) => render_printer_trio(&mut w, r, &prefix, &lines),
                Err(err) => {
                    let GenerationError::UnsupportedShape {
                        decl, type_name, ..
                    } = &err;
                    w.line(format!(
                        "/* GENERATION ERROR: {}: no pretty-printer rendering for '{}' */",
                        decl, type_name
                    ));
                    engine.report_generation_error(err);
                }
            }
        }
    }

    w.finish()
}

fn render_printer_trio(w: &mut CWriter, r: &RecordDecl, prefix: &str, body: &[String]) {
    let kw = r.kind.keyword();
    let obj = format!("const {} {} *obj", kw, r.name);

    w.line("static int");
    w.line(format!("{}_yaml(FILE *stream, {}, int flags)", r.name, obj));
    w.line("{");
    w.line("\tint wrtn = 0;");
    w.blank();
    w.line(format!("\twrtn += fprintf(stream, \"{}:\");", r.name));
    w.blank();
    w.line("\tif (!obj) {");
    w.line("\t\twrtn += fprintf(stream, \" ~\\n\");");
    w.line("\t\treturn wrtn;");
    w.line("\t}");
    w.blank();
    w.line("\twrtn += fprintf(stream, \"\\n\");");
    for line in body {
        w.line(line);
    }
    w.blank();
    w.line("\treturn wrtn;");
    w.line("}");
    w.blank();

    w.line("int");
    w.line(format!("{}_fpr(FILE *stream, {}, int flags)", r.name, obj));
    w.line("{");
    w.line("\tswitch (flags) {");
    w.line(format!("\tcase {}_PR_DEF:", prefix));
    w.line(format!("\tcase {}_PR_YAML:", prefix));
    w.line(format!("\t\treturn {}_yaml(stream, obj, flags);", r.name));
    w.blank();
    w.line(format!("\tcase {}_PR_JSON:", prefix));
    w.line("\t\treturn -ENOSYS;");
    w.line("\t}");
    w.blank();
    w.line("\treturn -ENOSYS;");
    w.line("}");
    w.blank();

    w.line("int");
    w.line(format!("{}_pr({}, int flags)", r.name, obj));
    w.line("{");
    w.line(format!("\treturn {}_fpr(stdout, obj, flags);", r.name));
    w.line("}");
}

fn yaml_body(index: &TypeIndex, r: &RecordDecl) -> Result<Vec<String>, GenerationError> {
    r.fields
        .iter()
        .map(|field| yaml_field_line(index, r, field))
        .collect()
}

/// One `fprintf` per field, two-space indented under the object name.
fn yaml_field_line(
    index: &TypeIndex,
    r: &RecordDecl,
    field: &Field,
) -> Result<String, GenerationError> {
    let resolved = index.resolve(&field.ty);
    let name = &field.name;

    let line = match resolved {
        TypeRef::Primitive { prim, .. } => match prim {
            Primitive::Fixed { width, signed } => {
                let sign = if *signed { "i" } else { "u" };
                format!(
                    "\twrtn += fprintf(stream, \"  {}: %\" PRI{}{} \"\\n\", obj->{});",
                    name, sign, width, name
                )
            }
            Primitive::SysInt { kind, signed } => {
                let fmt = sysint_format(*kind, *signed);
                plain_line(name, fmt)
            }
            Primitive::Char { .. } => plain_line(name, "%c"),
            Primitive::Bool => plain_line(name, "%d"),
            Primitive::Float(_) => plain_line(name, "%f"),
            Primitive::Void => return Err(unsupported(r, field, resolved)),
        },
        TypeRef::Named { name: target, hint, .. } => match hint {
            Some(TagHint::Enum) => plain_line(name, "%d"),
            Some(TagHint::Struct) | Some(TagHint::Union) => {
                if index.records.contains_key(target.as_str()) {
                    format!("\twrtn += {}_fpr(stream, &obj->{}, flags);", target, name)
                } else {
                    return Err(unsupported(r, field, resolved));
                }
            }
            None => {
                // a bare name surviving resolve() is either an enum
                // typedef or genuinely unknown
                if index.enums.contains_key(target.as_str()) {
                    plain_line(name, "%d")
                } else {
                    return Err(unsupported(r, field, resolved));
                }
            }
        },
        TypeRef::Pointer { inner, depth } => {
            if *depth == 1 && matches!(**inner, TypeRef::Primitive { prim: Primitive::Char { sign: CharSign::Plain }, .. }) {
                plain_line(name, "%s")
            } else {
                format!(
                    "\twrtn += fprintf(stream, \"  {}: %p\\n\", (void *)obj->{});",
                    name, name
                )
            }
        }
        TypeRef::FunctionPointer { .. } => return Err(unsupported(r, field, resolved)),
    };
    Ok(line)
}

fn plain_line(name: &str, fmt: &str) -> String {
    format!(
        "\twrtn += fprintf(stream, \"  {}: {}\\n\", obj->{});",
        name, fmt, name
    )
}

fn sysint_format(kind: SysKind, signed: bool) -> &'static str {
    match (kind, signed) {
        (SysKind::Short, true) => "%hd",
        (SysKind::Short, false) => "%hu",
        (SysKind::Int, true) => "%d",
        (SysKind::Int, false) => "%u",
        (SysKind::Long, true) => "%ld",
        (SysKind::Long, false) => "%lu",
        (SysKind::LongLong, true) => "%lld",
        (SysKind::LongLong, false) => "%llu",
    }
}

fn unsupported(r: &RecordDecl, field: &Field, ty: &TypeRef) -> GenerationError {
    GenerationError::UnsupportedShape {
        decl: format!("{}.{}", r.name, field.name),
        emitter: "pp-impl",
        type_name: spelling(ty),
        location: field.span,
    }
}
