//! End-to-end tests driving [`Compiler`] the way the binary does: real
//! input files, real output directory, all stages in one run.

use hemit::compiler::{Cli, Compiler};
use hemit::diagnostic::DiagnosticKind;
use hemit::generate::Profile;
use std::fs;
use tempfile::tempdir;

const EXAMPLE_INPUT: &str = r#"
#define MAX_X 128 ///< Maximum value of X

/**
 * Opcodes for point operation processor
 */
enum ops {
	ADD = 0x0, ///< Add two points
	SUB = 0x1, ///< Subtract two points
};

/**
 * Point in three dimensional space
 */
struct point {
	uint32_t x; ///< X Coordinate
	uint32_t y; ///< Y Coordinate
};

int
example_hw(int argc, const char **argv);
"#;

fn cli_for(input: &str, output: &str, name: Option<&str>, emit: &[&str]) -> Cli {
    Cli {
        inputs: vec![input.to_string()],
        name: name.map(str::to_string),
        output: output.to_string(),
        emit: emit.iter().map(|s| s.to_string()).collect(),
        verbose: false,
    }
}

#[test]
fn full_run_writes_all_three_artifacts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("example.h");
    fs::write(&input, EXAMPLE_INPUT).unwrap();
    let out = dir.path().join("out");

    let cli = cli_for(
        input.to_str().unwrap(),
        out.to_str().unwrap(),
        Some("example"),
        &[],
    );
    Compiler::new(cli).run().expect("run succeeds");

    let defs = fs::read_to_string(out.join("libexample.h")).unwrap();
    assert!(defs.contains("#ifndef EXAMPLE_H"));
    assert!(defs.contains("struct point {"));
    assert!(defs.contains("#define MAX_X 128 ///< Maximum value of X"));

    let decls = fs::read_to_string(out.join("libexample_pp.h")).unwrap();
    assert!(decls.contains("enum example_pr {"));
    assert!(decls.contains("point_fpr(FILE *stream, const struct point *obj, int flags);"));

    let imp = fs::read_to_string(out.join("example_pp.c")).unwrap();
    assert!(imp.contains("static int"));
    assert!(imp.contains("point_yaml(FILE *stream, const struct point *obj, int flags)"));
}

#[test]
fn emit_selects_a_single_profile() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("example.h");
    fs::write(&input, EXAMPLE_INPUT).unwrap();
    let out = dir.path().join("out");

    let cli = cli_for(
        input.to_str().unwrap(),
        out.to_str().unwrap(),
        Some("example"),
        &["defs"],
    );
    Compiler::new(cli).run().expect("run succeeds");

    assert!(out.join("libexample.h").exists());
    assert!(!out.join("libexample_pp.h").exists());
    assert!(!out.join("example_pp.c").exists());
}

#[test]
fn unknown_emit_profile_is_an_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("example.h");
    fs::write(&input, EXAMPLE_INPUT).unwrap();

    let cli = cli_for(
        input.to_str().unwrap(),
        dir.path().to_str().unwrap(),
        None,
        &["json"],
    );
    let err = Compiler::new(cli).run().unwrap_err();
    assert!(err.message.contains("unknown emitter profile 'json'"));
}

#[test]
fn module_name_defaults_to_the_file_stem() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("plot.h");
    fs::write(&input, "struct point { uint32_t x; };\n").unwrap();
    let out = dir.path().join("out");

    let cli = cli_for(input.to_str().unwrap(), out.to_str().unwrap(), None, &[]);
    Compiler::new(cli).run().expect("run succeeds");

    assert!(out.join("libplot.h").exists());
    assert!(out.join("libplot_pp.h").exists());
    assert!(out.join("plot_pp.c").exists());
}

#[test]
fn invalid_input_fails_the_run_and_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("broken.h");
    fs::write(&input, "struct { uint8_t pack : 1; };\n").unwrap();
    let out = dir.path().join("out");

    let cli = cli_for(input.to_str().unwrap(), out.to_str().unwrap(), None, &[]);
    let err = Compiler::new(cli).run().unwrap_err();
    assert!(err.message.contains("errors were reported"));
    assert!(!out.join("libbroken.h").exists());
}

#[test]
fn generation_errors_still_write_artifacts_with_placeholders() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("calc.h");
    fs::write(
        &input,
        "typedef int (*binop_func)(int, int);\nstruct calc {\n\tbinop_func op;\n};\n",
    )
    .unwrap();
    let out = dir.path().join("out");

    let cli = cli_for(input.to_str().unwrap(), out.to_str().unwrap(), None, &[]);
    let err = Compiler::new(cli).run().unwrap_err();
    assert!(err.message.contains("errors were reported"));

    // the definitions header is fine, the printer carries the marker
    let defs = fs::read_to_string(out.join("libcalc.h")).unwrap();
    assert!(defs.contains("typedef int (*binop_func)(int, int);"));
    let imp = fs::read_to_string(out.join("calc_pp.c")).unwrap();
    assert!(imp.contains("GENERATION ERROR: calc.op"));
}

#[test]
fn run_virtual_needs_no_filesystem() {
    let cli = cli_for("unused.h", ".", Some("example"), &[]);
    let mut compiler = Compiler::new(cli);
    let output = compiler.run_virtual("example.h", EXAMPLE_INPUT, "example", &Profile::ALL);
    assert!(output.success);
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.artifacts.len(), 3);
    assert_eq!(output.artifacts[0].file_name, "libexample.h");
    assert_eq!(output.artifacts[1].file_name, "libexample_pp.h");
    assert_eq!(output.artifacts[2].file_name, "example_pp.c");
}

#[test]
fn fatal_lex_error_surfaces_as_a_diagnostic() {
    let cli = cli_for("unused.h", ".", None, &[]);
    let mut compiler = Compiler::new(cli);
    let output = compiler.run_virtual("bad.h", "/* never closed", "bad", &Profile::ALL);
    assert!(!output.success);
    assert!(output.artifacts.is_empty());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].kind, DiagnosticKind::Lex);
    let span = output.diagnostics[0].location;
    let located = compiler
        .source_map()
        .lookup_line_col(span.file_id(), span.start_offset());
    assert!(located.is_some());
}
