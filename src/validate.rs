//! Whole-module validation after parsing.
//!
//! One pass over the completed module: every `Named` reference is resolved
//! against its namespace, by-value containment cycles between aggregates
//! are rejected, and bit-field widths are checked against their base type.
//! All findings are accumulated; nothing stops at the first error.

use crate::diagnostic::{DiagnosticEngine, ReferenceError, SemanticError};
use crate::model::{
    Declaration, Module, Namespace, RecordDecl, SymbolTable, TagHint, TypeRef, TypedefDecl,
};
use crate::source::SourceSpan;
use indexmap::IndexMap;
use log::debug;

/// Runs all validation rules, reporting into `engine`.
pub fn validate(module: &Module, symbols: &SymbolTable, engine: &mut DiagnosticEngine) {
    let mut validator = Validator::new(module, symbols, engine);
    validator.run();
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Gray,
    Black,
}

struct Validator<'a, 'e> {
    module: &'a Module,
    symbols: &'a SymbolTable,
    engine: &'e mut DiagnosticEngine,
    records: IndexMap<&'a str, &'a RecordDecl>,
    typedefs: IndexMap<&'a str, &'a TypedefDecl>,
    marks: hashbrown::HashMap<String, Mark>,
}

impl<'a, 'e> Validator<'a, 'e> {
    fn new(module: &'a Module, symbols: &'a SymbolTable, engine: &'e mut DiagnosticEngine) -> Self {
        let mut records = IndexMap::new();
        let mut typedefs = IndexMap::new();
        for decl in &module.declarations {
            match decl {
                Declaration::Struct(r) | Declaration::Union(r) => {
                    records.insert(r.name.as_str(), r);
                }
                Declaration::Typedef(t) => {
                    typedefs.insert(t.name.as_str(), t);
                }
                _ => {}
            }
        }
        Validator {
            module,
            symbols,
            engine,
            records,
            typedefs,
            marks: hashbrown::HashMap::new(),
        }
    }

    fn run(&mut self) {
        let module = self.module;
        for decl in &module.declarations {
            match decl {
                Declaration::Struct(record) | Declaration::Union(record) => {
                    for field in &record.fields {
                        let referrer = format!("{}.{}", record.name, field.name);
                        self.check_type(&field.ty, &referrer, field.span);
                        if let Some(width) = field.bits {
                            self.check_bit_field(&field.ty, &field.name, width, field.span);
                        }
                    }
                }
                Declaration::Typedef(typedef) => {
                    self.check_type(&typedef.ty, &typedef.name, typedef.span);
                }
                Declaration::Function(function) => {
                    self.check_type(&function.ret, &function.name, function.span);
                    for param in &function.params {
                        let referrer = match &param.name {
                            Some(name) => format!("{}.{}", function.name, name),
                            None => function.name.clone(),
                        };
                        self.check_type(&param.ty, &referrer, param.span);
                    }
                }
                Declaration::Enum(_) | Declaration::Macro(_) => {}
            }
        }

        let record_names: Vec<String> = self.records.keys().map(|n| n.to_string()).collect();
        for name in record_names {
            if !self.marks.contains_key(&name) {
                self.visit_record(&name);
            }
        }
        debug!(
            "validated module '{}': {} declarations",
            module.name,
            module.declarations.len()
        );
    }

    /// Resolves every `Named` reference inside `ty`, recursing through
    /// pointers and function-pointer signatures.
    fn check_type(&mut self, ty: &TypeRef, referrer: &str, span: SourceSpan) {
        match ty {
            TypeRef::Primitive { .. } => {}
            TypeRef::Named { name, hint, .. } => {
                let ns = match hint {
                    Some(TagHint::Struct) | Some(TagHint::Union) => Namespace::RecordTag,
                    Some(TagHint::Enum) => Namespace::EnumTag,
                    None => Namespace::Typedef,
                };
                if !self.symbols.contains(ns, name) {
                    self.engine.report_reference_error(ReferenceError::Unresolved {
                        type_name: name.clone(),
                        referrer: referrer.to_string(),
                        location: span,
                    });
                }
            }
            TypeRef::Pointer { inner, .. } => self.check_type(inner, referrer, span),
            TypeRef::FunctionPointer { ret, params } => {
                self.check_type(ret, referrer, span);
                for param in params {
                    self.check_type(param, referrer, span);
                }
            }
        }
    }

    fn check_bit_field(&mut self, ty: &TypeRef, field: &str, width: u32, span: SourceSpan) {
        match ty.bit_size() {
            Some(base_width) => {
                if width > base_width {
                    self.engine.report_semantic_error(SemanticError::BitfieldTooWide {
                        field: field.to_string(),
                        width,
                        base_width,
                        location: span,
                    });
                }
            }
            None => {
                self.engine
                    .report_semantic_error(SemanticError::BitfieldOnNonInteger {
                        field: field.to_string(),
                        location: span,
                    });
            }
        }
    }

    /// Depth-first search over by-value containment edges. Hitting a
    /// record that is still on the current path closes a cycle.
    fn visit_record(&mut self, name: &str) {
        let Some(&record) = self.records.get(name) else {
            return;
        };
        self.marks.insert(name.to_string(), Mark::Gray);

        for field in &record.fields {
            let Some(target) = self.by_value_record_target(&field.ty) else {
                continue;
            };
            match self.marks.get(&target).copied() {
                Some(Mark::Gray) => {
                    self.engine
                        .report_reference_error(ReferenceError::ContainmentCycle {
                            type_name: target,
                            location: field.span,
                        });
                }
                Some(Mark::Black) => {}
                None => self.visit_record(&target),
            }
        }

        self.marks.insert(name.to_string(), Mark::Black);
    }

    /// The record a field embeds by value, if any. Pointer-mediated
    /// references never form an edge; typedef aliases are chased.
    fn by_value_record_target(&self, ty: &TypeRef) -> Option<String> {
        let mut ty = ty;
        // typedef chains are short; the bound only guards pathological input
        for _ in 0..32 {
            match ty {
                TypeRef::Named {
                    name,
                    hint: Some(TagHint::Struct) | Some(TagHint::Union),
                    ..
                } => {
                    return self.records.contains_key(name.as_str()).then(|| name.clone());
                }
                TypeRef::Named {
                    name, hint: None, ..
                } => match self.typedefs.get(name.as_str()) {
                    Some(typedef) => ty = &typedef.ty,
                    None => return None,
                },
                _ => return None,
            }
        }
        None
    }
}
