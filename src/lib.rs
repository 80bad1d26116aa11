//! A code-generation toolchain for documentation-annotated C declaration
//! headers: parse, validate, and emit a definitions header plus paired
//! pretty-printer artifacts.
pub mod source;

/// Contains the compiler driver and command line.
pub mod compiler;
/// Contains diagnostics and the per-stage error types.
pub mod diagnostic;
/// Contains the documentation-comment model.
pub mod doc;
/// Contains the code generator and emitter profiles.
pub mod generate;
pub mod lexer;
/// Contains the logger.
pub mod logger;
/// Contains the intermediate model.
pub mod model;
pub mod parser;
/// Contains the printer-flag contract.
pub mod printer;
pub mod validate;
