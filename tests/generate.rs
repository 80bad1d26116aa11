//! Tests for the code generator: golden artifact layouts, determinism,
//! unsupported-shape handling and the printer flag policy.

use hemit::diagnostic::{DiagnosticEngine, DiagnosticKind};
use hemit::generate::{Profile, generate};
use hemit::lexer;
use hemit::model::Module;
use hemit::parser;
use hemit::printer::{self, PR_DEF, PR_JSON, PR_YAML};
use hemit::source::{FileId, SourceFile};
use hemit::validate::validate;

fn build_module(input: &str) -> Module {
    let file = SourceFile::new(FileId(0), "test.h".into(), input.to_string());
    let mut engine = DiagnosticEngine::new();
    let lexed = lexer::lex(&file, &mut engine).expect("no fatal lex error expected");
    let parsed = parser::parse("example", lexed, &mut engine);
    validate(&parsed.module, &parsed.symbols, &mut engine);
    assert!(!engine.has_errors(), "input must validate cleanly");
    parsed.module
}

const EXAMPLE_INPUT: &str = r#"
#define MAX_X 128 ///< Maximum value of X

/**
 * Opcodes for point operation processor
 */
enum ops {
	ADD = 0x0, ///< Add two points
	SUB = 0x1, ///< Subtract two points
	MUL = 0x2, ///< Multiply two points
};

/**
 * Point in three dimensional space
 */
struct point {
	uint32_t x; ///< X Coordinate
	uint32_t y; ///< Y Coordinate
	uint32_t z; ///< Z Coordinate
};
"#;

#[test]
fn defs_header_layout() {
    let module = build_module(EXAMPLE_INPUT);
    let mut engine = DiagnosticEngine::new();
    let artifact = generate(&module, Profile::Defs, &mut engine);
    assert!(!engine.has_errors());
    assert_eq!(artifact.file_name, "libexample.h");
    assert_eq!(
        artifact.content,
        r#"/**
 * Public definitions for the example module
 *
 * NOTE: This file is auto-generated
 *
 * @file libexample.h
 */
#ifndef EXAMPLE_H
#define EXAMPLE_H

#ifdef __cplusplus
extern "C" {
#endif

#include <stdbool.h>
#include <stdint.h>

#define MAX_X 128 ///< Maximum value of X

/**
 * Opcodes for point operation processor
 *
 * @enum ops
 */
enum ops {
	ADD = 0x0, ///< Add two points
	SUB = 0x1, ///< Subtract two points
	MUL = 0x2, ///< Multiply two points
};

/**
 * Point in three dimensional space
 *
 * @struct point
 */
struct point {
	uint32_t x; ///< X Coordinate
	uint32_t y; ///< Y Coordinate
	uint32_t z; ///< Z Coordinate
};

#ifdef __cplusplus
}
#endif

#endif /* EXAMPLE_H */
"#
    );
}

#[test]
fn pp_declarations_layout() {
    let module = build_module(EXAMPLE_INPUT);
    let mut engine = DiagnosticEngine::new();
    let artifact = generate(&module, Profile::PpDecls, &mut engine);
    assert!(!engine.has_errors());
    assert_eq!(artifact.file_name, "libexample_pp.h");
    assert_eq!(
        artifact.content,
        r#"/**
 * Pretty-printers for the enums and structs of the example module
 *
 * NOTE: This file is auto-generated
 *
 * @file libexample_pp.h
 */

/**
 * Options for pretty-printer (``*_pr``, ``*_fpr``) functions
 *
 * Options determines the format the pretty-printer uses, e.g. Yaml or JSON
 *
 * @enum example_pr
 */
enum example_pr {
	EXAMPLE_PR_DEF  = 0x0,
	EXAMPLE_PR_YAML = 0x1,
	EXAMPLE_PR_JSON = 0x2,
};

/**
 * Prints the given ::point 'obj' to the given output 'stream'
 *
 * @param stream output stream used for printing
 * @param obj Pointer to the ::point to print
 * @param flags Pretty-printer flags
 *
 * @return On success, the number of characters printed is returned.
 */
int
point_fpr(FILE *stream, const struct point *obj, int flags);

/**
 * Prints the given ::point 'obj' to stdout
 *
 * @param obj Pointer to the ::point to print
 * @param flags Pretty-printer flags
 *
 * @return On success, the number of characters printed is returned.
 */
int
point_pr(const struct point *obj, int flags);
"#
    );
}

#[test]
fn pp_implementation_layout() {
    let module = build_module(EXAMPLE_INPUT);
    let mut engine = DiagnosticEngine::new();
    let artifact = generate(&module, Profile::PpImpl, &mut engine);
    assert!(!engine.has_errors());
    assert_eq!(artifact.file_name, "example_pp.c");
    assert_eq!(
        artifact.content,
        r#"/**
 * Pretty-printer implementations for the example module
 *
 * NOTE: This file is auto-generated
 *
 * @file example_pp.c
 */
#include <inttypes.h>
#include <stdio.h>
#include <errno.h>
#include <libexample.h>
#include <libexample_pp.h>

static int
point_yaml(FILE *stream, const struct point *obj, int flags)
{
	int wrtn = 0;

	wrtn += fprintf(stream, "point:");

	if (!obj) {
		wrtn += fprintf(stream, " ~\n");
		return wrtn;
	}

	wrtn += fprintf(stream, "\n");
	wrtn += fprintf(stream, "  x: %" PRIu32 "\n", obj->x);
	wrtn += fprintf(stream, "  y: %" PRIu32 "\n", obj->y);
	wrtn += fprintf(stream, "  z: %" PRIu32 "\n", obj->z);

	return wrtn;
}

int
point_fpr(FILE *stream, const struct point *obj, int flags)
{
	switch (flags) {
	case EXAMPLE_PR_DEF:
	case EXAMPLE_PR_YAML:
		return point_yaml(stream, obj, flags);

	case EXAMPLE_PR_JSON:
		return -ENOSYS;
	}

	return -ENOSYS;
}

int
point_pr(const struct point *obj, int flags)
{
	return point_fpr(stdout, obj, flags);
}
"#
    );
}

#[test]
fn generation_is_deterministic() {
    let module = build_module(EXAMPLE_INPUT);
    for profile in Profile::ALL {
        let mut engine = DiagnosticEngine::new();
        let first = generate(&module, profile, &mut engine);
        let second = generate(&module, profile, &mut engine);
        assert_eq!(first, second);
    }
}

#[test]
fn round_trip_preserves_field_names_and_order() {
    let module = build_module(EXAMPLE_INPUT);
    let mut engine = DiagnosticEngine::new();
    let artifact = generate(&module, Profile::Defs, &mut engine);
    let positions: Vec<usize> = ["uint32_t x;", "uint32_t y;", "uint32_t z;"]
        .iter()
        .map(|needle| artifact.content.find(needle).expect("field present"))
        .collect();
    assert!(positions[0] < positions[1] && positions[1] < positions[2]);
}

#[test]
fn unsupported_shape_gets_placeholder_and_the_run_continues() {
    let module = build_module(
        r#"
typedef int (*binop_func)(int, int);
struct calc {
	binop_func op;
};
struct point {
	uint32_t x;
};
"#,
    );
    let mut engine = DiagnosticEngine::new();
    let artifact = generate(&module, Profile::PpImpl, &mut engine);
    assert!(engine.has_errors());
    let generation: Vec<_> = engine
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Generation)
        .collect();
    assert_eq!(generation.len(), 1);
    assert!(generation[0].message.contains("calc.op"));

    assert!(artifact.content.contains(
        "/* GENERATION ERROR: calc.op: no pretty-printer rendering for 'int (*)(int, int)' */"
    ));
    // the remaining declarations still rendered
    assert!(artifact.content.contains("point_fpr"));
    assert!(!artifact.content.contains("calc_yaml"));
}

#[test]
fn defs_header_still_renders_function_pointer_fields() {
    let module = build_module(
        r#"
typedef int (*binop_func)(int, int);
struct calc {
	binop_func op;
};
"#,
    );
    let mut engine = DiagnosticEngine::new();
    let artifact = generate(&module, Profile::Defs, &mut engine);
    assert!(!engine.has_errors());
    assert!(artifact.content.contains("typedef int (*binop_func)(int, int);"));
    assert!(artifact.content.contains("\tbinop_func op;"));
}

#[test]
fn mixed_field_shapes_map_to_their_formats() {
    let module = build_module(
        r#"
enum ops { ADD };
struct point { uint32_t x; };
struct mixed {
	int8_t tiny;
	unsigned long ul;
	bool flag;
	double ratio;
	char letter;
	const char *label;
	uint8_t *raw;
	enum ops op;
	struct point origin;
};
"#,
    );
    let mut engine = DiagnosticEngine::new();
    let artifact = generate(&module, Profile::PpImpl, &mut engine);
    assert!(!engine.has_errors());
    let content = &artifact.content;
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  tiny: %" PRIi8 "\n", obj->tiny);"#));
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  ul: %lu\n", obj->ul);"#));
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  flag: %d\n", obj->flag);"#));
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  ratio: %f\n", obj->ratio);"#));
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  letter: %c\n", obj->letter);"#));
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  label: %s\n", obj->label);"#));
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  raw: %p\n", (void *)obj->raw);"#));
    assert!(content.contains(r#"	wrtn += fprintf(stream, "  op: %d\n", obj->op);"#));
    assert!(content.contains("\twrtn += point_fpr(stream, &obj->origin, flags);"));
}

#[test]
fn json_flag_writes_nothing_and_reports_not_implemented() {
    let mut out = Vec::new();
    let ret = printer::dispatch(&mut out, PR_JSON, |s| printer::write_null_object(s, "point"));
    assert_eq!(ret, -printer::ENOSYS);
    assert!(out.is_empty());
}

#[test]
fn unrecognized_flags_behave_like_json() {
    for flags in [0x3, 0x7, -1, i32::MAX] {
        let mut out = Vec::new();
        let ret = printer::dispatch(&mut out, flags, |s| printer::write_null_object(s, "point"));
        assert_eq!(ret, -printer::ENOSYS);
        assert!(out.is_empty());
    }
}

#[test]
fn null_object_prints_tilde_and_counts_characters() {
    for flags in [PR_DEF, PR_YAML] {
        let mut out = Vec::new();
        let ret = printer::dispatch(&mut out, flags, |s| printer::write_null_object(s, "point"));
        assert_eq!(out, b"point: ~\n");
        assert_eq!(ret, 9);
    }
}
