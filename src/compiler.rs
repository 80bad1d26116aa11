//! The per-file pipeline driver and its command line.
//!
//! [`Compiler::run`] reads each input header, runs
//! lex → parse → validate → generate, prints accumulated diagnostics and
//! writes the rendered artifacts into the output directory. A run fails
//! if any file produced an error-severity diagnostic, even when artifacts
//! (with placeholders) were still written.

use crate::diagnostic::{Diagnostic, DiagnosticEngine, ErrorFormatter};
use crate::generate::{Artifact, Profile, generate};
use crate::lexer;
use crate::logger::Logger;
use crate::parser;
use crate::source::SourceMap;
use crate::validate::validate;
use clap::Parser as ClapParser;
use std::fs;
use std::path::{Path, PathBuf};

/// Command-line arguments for the header emitter.
#[derive(ClapParser, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input header files
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Module name; defaults to the input file stem
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output directory for generated artifacts
    #[arg(short, long, default_value = ".")]
    pub output: String,

    /// Emitter profiles to run: defs, pp-decls, pp-impl (default: all)
    #[arg(long = "emit")]
    pub emit: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CompilerError {
    pub message: String,
}

impl CompilerError {
    fn new(message: impl Into<String>) -> Self {
        CompilerError {
            message: message.into(),
        }
    }
}

/// Everything one file produced: rendered artifacts plus the diagnostics
/// accumulated across all stages.
pub struct ProcessOutput {
    pub artifacts: Vec<Artifact>,
    pub diagnostics: Vec<Diagnostic>,
    pub success: bool,
}

pub struct Compiler {
    cli: Cli,
    logger: Logger,
    source_map: SourceMap,
}

impl Compiler {
    pub fn new(cli: Cli) -> Self {
        let logger = Logger::new(cli.verbose);
        Self {
            cli,
            logger,
            source_map: SourceMap::new(),
        }
    }

    /// Drives the whole run from the command line.
    pub fn run(&mut self) -> Result<(), CompilerError> {
        self.logger.log("Verbose output enabled");
        let profiles = self.profiles()?;
        let output_dir = PathBuf::from(&self.cli.output);
        fs::create_dir_all(&output_dir)
            .map_err(|e| CompilerError::new(format!("cannot create {:?}: {}", output_dir, e)))?;

        let mut failed = false;
        for input in self.cli.inputs.clone() {
            let content = fs::read_to_string(&input)
                .map_err(|e| CompilerError::new(format!("cannot read {}: {}", input, e)))?;
            let module_name = self.module_name_for(&input);
            self.logger
                .log(&format!("processing {} as module '{}'", input, module_name));

            let output = self.run_virtual(&input, &content, &module_name, &profiles);
            ErrorFormatter.print_diagnostics(&output.diagnostics, &self.source_map);
            if !output.success {
                failed = true;
            }

            for artifact in &output.artifacts {
                let path = output_dir.join(&artifact.file_name);
                self.logger.log(&format!("writing {:?}", path));
                fs::write(&path, &artifact.content)
                    .map_err(|e| CompilerError::new(format!("cannot write {:?}: {}", path, e)))?;
            }
        }

        if failed {
            Err(CompilerError::new("errors were reported"))
        } else {
            Ok(())
        }
    }

    /// Runs the pipeline on in-memory content without touching the
    /// filesystem. Artifacts are only rendered when lexing, parsing and
    /// validation came through clean; generation errors still yield
    /// artifacts, with placeholders, and an unsuccessful result.
    pub fn run_virtual(
        &mut self,
        path: &str,
        content: &str,
        module_name: &str,
        profiles: &[Profile],
    ) -> ProcessOutput {
        let file_id = self.source_map.add(PathBuf::from(path), content.to_string());
        let mut engine = DiagnosticEngine::new();
        let mut artifacts = Vec::new();

        // source_map owns the content; lexing borrows it back
        let file = self
            .source_map
            .get(file_id)
            .cloned()
            .unwrap_or_else(|| unreachable!("file was just registered"));

        match lexer::lex(&file, &mut engine) {
            Ok(lexed) => {
                let parsed = parser::parse(module_name, lexed, &mut engine);
                validate(&parsed.module, &parsed.symbols, &mut engine);

                if !engine.has_errors() {
                    for profile in profiles {
                        artifacts.push(generate(&parsed.module, *profile, &mut engine));
                    }
                }
            }
            Err(fatal) => engine.report_lex_error(fatal),
        }

        let success = !engine.has_errors();
        ProcessOutput {
            artifacts,
            diagnostics: engine.diagnostics,
            success,
        }
    }

    pub fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Maps `--emit` values to profiles; empty means all of them.
    fn profiles(&self) -> Result<Vec<Profile>, CompilerError> {
        if self.cli.emit.is_empty() {
            return Ok(Profile::ALL.to_vec());
        }
        self.cli
            .emit
            .iter()
            .map(|name| {
                Profile::from_name(name)
                    .ok_or_else(|| CompilerError::new(format!("unknown emitter profile '{}'", name)))
            })
            .collect()
    }

    fn module_name_for(&self, input: &str) -> String {
        match &self.cli.name {
            Some(name) => name.clone(),
            None => Path::new(input)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("module")
                .to_string(),
        }
    }
}
