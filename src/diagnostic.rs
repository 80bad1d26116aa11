use crate::lexer::TokenKind;
use crate::source::{SourceMap, SourceSpan};

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Warning,
    Note,
}

/// Which pipeline stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lex,
    Syntax,
    Semantic,
    Reference,
    Generation,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::Lex => "LexError",
            DiagnosticKind::Syntax => "SyntaxError",
            DiagnosticKind::Semantic => "SemanticError",
            DiagnosticKind::Reference => "ReferenceError",
            DiagnosticKind::Generation => "GenerationError",
        }
    }
}

/// Individual diagnostic record
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: SourceSpan,
}

/// Lexical failures. Both are fatal for the file being lexed: there is no
/// well-defined way to resynchronize a token stream in the middle of an
/// unterminated comment or string literal.
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unterminated block comment")]
    UnterminatedComment { location: SourceSpan },

    #[error("Unterminated string literal")]
    UnterminatedString { location: SourceSpan },
}

impl LexError {
    pub fn span(&self) -> SourceSpan {
        match self {
            LexError::UnterminatedComment { location } => *location,
            LexError::UnterminatedString { location } => *location,
        }
    }
}

/// Grammar violations found while parsing.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: TokenKind,
        location: SourceSpan,
    },

    #[error("Unexpected End of File")]
    UnexpectedEof { location: SourceSpan },

    #[error("Anonymous {keyword} is not supported; every aggregate must be named")]
    AnonymousAggregate {
        keyword: &'static str,
        location: SourceSpan,
    },

    #[error("Parameterized macro '{name}' is not supported; only literal defines are captured")]
    ParameterizedMacro { name: String, location: SourceSpan },

    #[error("Unsupported macro value for '{name}'; expected integer, hex or string literal")]
    UnsupportedMacroValue { name: String, location: SourceSpan },

    #[error("Nested block comments are not supported")]
    NestedBlockComment { location: SourceSpan },

    #[error("Unexpected character '{ch}'")]
    UnexpectedChar { ch: char, location: SourceSpan },
}

impl SyntaxError {
    pub fn span(&self) -> SourceSpan {
        match self {
            SyntaxError::UnexpectedToken { location, .. } => *location,
            SyntaxError::UnexpectedEof { location } => *location,
            SyntaxError::AnonymousAggregate { location, .. } => *location,
            SyntaxError::ParameterizedMacro { location, .. } => *location,
            SyntaxError::UnsupportedMacroValue { location, .. } => *location,
            SyntaxError::NestedBlockComment { location } => *location,
            SyntaxError::UnexpectedChar { location, .. } => *location,
        }
    }
}

/// Violations of model invariants that name resolution cannot catch.
#[derive(Debug, thiserror::Error)]
pub enum SemanticError {
    #[error("Duplicate declaration of '{name}' in the {namespace} namespace")]
    DuplicateName {
        name: String,
        namespace: &'static str,
        location: SourceSpan,
    },

    #[error("Bit-field '{field}' is {width} bits wide but its base type holds only {base_width}")]
    BitfieldTooWide {
        field: String,
        width: u32,
        base_width: u32,
        location: SourceSpan,
    },

    #[error("Bit-field '{field}' declared on a non-integer base type")]
    BitfieldOnNonInteger { field: String, location: SourceSpan },
}

impl SemanticError {
    pub fn span(&self) -> SourceSpan {
        match self {
            SemanticError::DuplicateName { location, .. } => *location,
            SemanticError::BitfieldTooWide { location, .. } => *location,
            SemanticError::BitfieldOnNonInteger { location, .. } => *location,
        }
    }
}

/// Unresolved or cyclic named-type references, found by the validator.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Unresolved type '{type_name}' referenced by '{referrer}'")]
    Unresolved {
        type_name: String,
        referrer: String,
        location: SourceSpan,
    },

    #[error("By-value containment cycle through '{type_name}'")]
    ContainmentCycle {
        type_name: String,
        location: SourceSpan,
    },
}

impl ReferenceError {
    pub fn span(&self) -> SourceSpan {
        match self {
            ReferenceError::Unresolved { location, .. } => *location,
            ReferenceError::ContainmentCycle { location, .. } => *location,
        }
    }
}

/// Per-declaration emitter failures. Recoverable: the declaration gets a
/// marked placeholder and the run continues, but the overall result is
/// still a failure.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Unsupported shape in '{decl}': no {emitter} rendering for {type_name}")]
    UnsupportedShape {
        decl: String,
        emitter: &'static str,
        type_name: String,
        location: SourceSpan,
    },
}

impl GenerationError {
    pub fn span(&self) -> SourceSpan {
        match self {
            GenerationError::UnsupportedShape { location, .. } => *location,
        }
    }
}

/// Diagnostic engine for collecting and reporting errors across stages
#[derive(Default)]
pub struct DiagnosticEngine {
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
    pub fn new() -> Self {
        DiagnosticEngine {
            diagnostics: Vec::new(),
        }
    }

    pub fn report_lex_error(&mut self, error: LexError) {
        let span = error.span();
        self.push(DiagnosticKind::Lex, error.to_string(), span);
    }

    pub fn report_syntax_error(&mut self, error: SyntaxError) {
        let span = error.span();
        self.push(DiagnosticKind::Syntax, error.to_string(), span);
    }

    pub fn report_semantic_error(&mut self, error: SemanticError) {
        let span = error.span();
        self.push(DiagnosticKind::Semantic, error.to_string(), span);
    }

    pub fn report_reference_error(&mut self, error: ReferenceError) {
        let span = error.span();
        self.push(DiagnosticKind::Reference, error.to_string(), span);
    }

    pub fn report_generation_error(&mut self, error: GenerationError) {
        let span = error.span();
        self.push(DiagnosticKind::Generation, error.to_string(), span);
    }

    fn push(&mut self, kind: DiagnosticKind, message: String, location: SourceSpan) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Error,
            kind,
            message,
            location,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Formatter turning diagnostics into `file:line:col` records.
#[derive(Default)]
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format a single diagnostic with resolved source location
    pub fn format_diagnostic(&self, diag: &Diagnostic, source_map: &SourceMap) -> String {
        let level_str = match diag.level {
            DiagnosticLevel::Error => "error",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Note => "note",
        };

        let mut result = format!("{}[{}]: {}", level_str, diag.kind.as_str(), diag.message);

        if let Some(file) = source_map.get(diag.location.file_id()) {
            let (line, col) = file.lookup_line_col(diag.location.start_offset());
            result.push_str(&format!(
                " at {}:{}:{}",
                file.name.to_str().unwrap_or("<invalid>"),
                line,
                col
            ));
        }

        result
    }

    /// Print all diagnostics to stderr
    pub fn print_diagnostics(&self, diagnostics: &[Diagnostic], source_map: &SourceMap) {
        for diag in diagnostics {
            eprintln!("{}", self.format_diagnostic(diag, source_map));
        }
    }
}
