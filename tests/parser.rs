//! Tests for the declaration parser and its symbol table.

use hemit::diagnostic::{DiagnosticEngine, DiagnosticKind};
use hemit::lexer;
use hemit::model::{
    CharSign, Declaration, Namespace, Primitive, RecordKind, TagHint, TypeRef,
};
use hemit::parser::{self, ParseOutput};
use hemit::source::{FileId, SourceFile};

fn parse_source(input: &str) -> (ParseOutput, DiagnosticEngine) {
    let file = SourceFile::new(FileId(0), "test.h".into(), input.to_string());
    let mut engine = DiagnosticEngine::new();
    let lexed = lexer::lex(&file, &mut engine).expect("no fatal lex error expected");
    let output = parser::parse("example", lexed, &mut engine);
    (output, engine)
}

#[test]
fn enum_with_implicit_and_explicit_values() {
    let source = r#"
enum ops {
	ADD,
	SUB,
	MUL = 5,
	DIV,
};
"#;
    let (output, engine) = parse_source(source);
    assert!(!engine.has_errors());
    assert_eq!(output.module.declarations.len(), 1);
    let Declaration::Enum(decl) = &output.module.declarations[0] else {
        panic!("expected an enum");
    };
    assert_eq!(decl.name, "ops");
    assert_eq!(decl.resolved_values(), vec![0, 1, 5, 6]);
    assert!(output.symbols.contains(Namespace::EnumTag, "ops"));
}

#[test]
fn enum_docs_and_hex_values() {
    let source = r#"
/**
 * Opcodes for point operation processor
 */
enum ops {
	ADD = 0x0, ///< Add two points
	SUB = 0x1, ///< Subtract two points
};
"#;
    let (output, engine) = parse_source(source);
    assert!(!engine.has_errors());
    let Declaration::Enum(decl) = &output.module.declarations[0] else {
        panic!("expected an enum");
    };
    assert_eq!(
        decl.doc.as_ref().unwrap().brief,
        "Opcodes for point operation processor"
    );
    assert_eq!(
        decl.enumerators[0].doc.as_ref().unwrap().brief,
        "Add two points"
    );
    let value = decl.enumerators[1].value.unwrap();
    assert_eq!(value.value, 1);
    assert!(value.hex);
}

#[test]
fn struct_fields_in_order_with_docs() {
    let source = r#"
/**
 * Point in three dimensional space
 */
struct point {
	uint32_t x; ///< X Coordinate
	uint32_t y; ///< Y Coordinate
	uint32_t z; ///< Z Coordinate
};
"#;
    let (output, engine) = parse_source(source);
    assert!(!engine.has_errors());
    let Declaration::Struct(decl) = &output.module.declarations[0] else {
        panic!("expected a struct");
    };
    assert_eq!(decl.kind, RecordKind::Struct);
    let names: Vec<&str> = decl.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);
    assert_eq!(decl.fields[0].doc.as_ref().unwrap().brief, "X Coordinate");
    assert_eq!(
        decl.fields[0].ty,
        TypeRef::Primitive {
            prim: Primitive::Fixed {
                width: 32,
                signed: false
            },
            is_const: false
        }
    );
    assert!(output.symbols.contains(Namespace::RecordTag, "point"));
}

#[test]
fn bit_fields_and_sysint_spellings() {
    let source = r#"
struct opts {
	uint8_t pack : 1;
	uint8_t foo : 3;
	unsigned long long int ull;
	long int li;
};
"#;
    let (output, engine) = parse_source(source);
    assert!(!engine.has_errors());
    let Declaration::Struct(decl) = &output.module.declarations[0] else {
        panic!("expected a struct");
    };
    assert_eq!(decl.fields[0].bits, Some(1));
    assert_eq!(decl.fields[1].bits, Some(3));
    assert_eq!(decl.fields[2].bits, None);
    assert_eq!(decl.fields[2].ty.bit_size(), Some(64));
    assert_eq!(decl.fields[3].ty.bit_size(), Some(64));
}

#[test]
fn union_declaration() {
    let (output, engine) = parse_source("union value { int32_t i; float f; };");
    assert!(!engine.has_errors());
    let Declaration::Union(decl) = &output.module.declarations[0] else {
        panic!("expected a union");
    };
    assert_eq!(decl.kind, RecordKind::Union);
    assert_eq!(decl.fields.len(), 2);
    assert!(output.symbols.contains(Namespace::RecordTag, "value"));
}

#[test]
fn function_pointer_typedef() {
    let (output, engine) = parse_source("typedef int (*binop_func)(int, int);");
    assert!(!engine.has_errors());
    let Declaration::Typedef(decl) = &output.module.declarations[0] else {
        panic!("expected a typedef");
    };
    assert_eq!(decl.name, "binop_func");
    let TypeRef::FunctionPointer { ret, params } = &decl.ty else {
        panic!("expected a function pointer");
    };
    assert_eq!(
        **ret,
        TypeRef::Primitive {
            prim: Primitive::SysInt {
                kind: hemit::model::SysKind::Int,
                signed: true
            },
            is_const: false
        }
    );
    assert_eq!(params.len(), 2);
    assert!(output.symbols.contains(Namespace::Typedef, "binop_func"));
}

#[test]
fn function_with_params_and_doc_distribution() {
    let source = r#"
/**
 * Print hello world
 *
 * @param argc Number of command-line arguments
 * @param argv Argument vector
 *
 * @return On success, 0 is returned.
 */
int
example_hw(int argc, const char **argv);
"#;
    let (output, engine) = parse_source(source);
    assert!(!engine.has_errors());
    let Declaration::Function(decl) = &output.module.declarations[0] else {
        panic!("expected a function");
    };
    assert_eq!(decl.name, "example_hw");
    assert_eq!(decl.params.len(), 2);
    assert_eq!(decl.params[0].name.as_deref(), Some("argc"));
    assert_eq!(
        decl.params[0].doc.as_ref().unwrap().brief,
        "Number of command-line arguments"
    );
    assert_eq!(
        decl.params[1].doc.as_ref().unwrap().brief,
        "Argument vector"
    );
    assert_eq!(
        decl.params[1].ty,
        TypeRef::Pointer {
            inner: Box::new(TypeRef::Primitive {
                prim: Primitive::Char {
                    sign: CharSign::Plain
                },
                is_const: true
            }),
            depth: 2
        }
    );
    assert_eq!(
        decl.doc.as_ref().unwrap().ret.as_deref(),
        Some("On success, 0 is returned.")
    );
    assert!(output.symbols.contains(Namespace::Function, "example_hw"));
}

#[test]
fn void_parameter_list_is_empty() {
    let (output, engine) = parse_source("void reset(void);");
    assert!(!engine.has_errors());
    let Declaration::Function(decl) = &output.module.declarations[0] else {
        panic!("expected a function");
    };
    assert!(decl.params.is_empty());
}

#[test]
fn function_returning_named_enum() {
    let (output, engine) = parse_source("enum ops { ADD };\nenum ops get_op(void);");
    assert!(!engine.has_errors());
    assert_eq!(output.module.declarations.len(), 2);
    let Declaration::Function(decl) = &output.module.declarations[1] else {
        panic!("expected a function");
    };
    assert_eq!(
        decl.ret,
        TypeRef::Named {
            name: "ops".to_string(),
            hint: Some(TagHint::Enum),
            is_const: false
        }
    );
}

#[test]
fn macro_constants() {
    let (output, engine) =
        parse_source("#define MAX_X 128 ///< Maximum value of X\n#define NAME \"plot\"\n");
    assert!(!engine.has_errors());
    assert_eq!(output.module.declarations.len(), 2);
    let Declaration::Macro(decl) = &output.module.declarations[0] else {
        panic!("expected a macro");
    };
    assert_eq!(decl.name, "MAX_X");
    assert_eq!(decl.doc.as_ref().unwrap().brief, "Maximum value of X");
    assert!(output.symbols.contains(Namespace::Macro, "MAX_X"));
    assert!(output.symbols.contains(Namespace::Macro, "NAME"));
}

#[test]
fn anonymous_aggregate_is_rejected_and_parsing_continues() {
    let source = r#"
struct {
	uint8_t pack : 1;
};
struct point {
	uint32_t x;
};
"#;
    let (output, engine) = parse_source(source);
    assert!(engine.has_errors());
    let syntax: Vec<_> = engine
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Syntax)
        .collect();
    assert_eq!(syntax.len(), 1);
    assert!(syntax[0].message.contains("Anonymous"));
    // recovery resumed at the next declaration
    assert_eq!(output.module.declarations.len(), 1);
    assert_eq!(output.module.declarations[0].name(), "point");
}

#[test]
fn duplicate_tag_in_same_namespace() {
    let source = r#"
struct unsigned_syswidth {
	unsigned int u;
};
struct unsigned_syswidth {
	int i;
};
"#;
    let (output, engine) = parse_source(source);
    assert!(engine.has_errors());
    let semantic: Vec<_> = engine
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Semantic)
        .collect();
    assert_eq!(semantic.len(), 1);
    assert!(semantic[0].message.contains("unsigned_syswidth"));
    // both nodes survive; uniqueness is a namespace property
    assert_eq!(output.module.declarations.len(), 2);
}

#[test]
fn same_name_in_different_namespaces_is_fine() {
    let (_, engine) = parse_source("enum shape { CIRCLE };\nstruct shape { int32_t sides; };");
    assert!(!engine.has_errors());
}

#[test]
fn forward_reference_is_not_an_error_here() {
    let source = r#"
struct wrapper {
	struct inner nested;
};
struct inner {
	int32_t value;
};
"#;
    let (output, engine) = parse_source(source);
    assert!(!engine.has_errors());
    assert_eq!(output.module.declarations.len(), 2);
}

#[test]
fn error_recovery_reports_every_problem() {
    let source = r#"
enum ops { ADD = , };
struct { int32_t x; };
struct point { uint32_t x; };
"#;
    let (output, engine) = parse_source(source);
    let syntax_count = engine
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Syntax)
        .count();
    assert_eq!(syntax_count, 2);
    assert_eq!(output.module.declarations.len(), 1);
    assert_eq!(output.module.declarations[0].name(), "point");
}
