use clap::Parser as ClapParser;
use hemit::compiler::{Cli, Compiler};
use std::process::exit;

/// Parses command-line arguments and runs the header emitter.
fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let mut compiler = Compiler::new(cli);
    if let Err(err) = compiler.run() {
        eprintln!("error: {}", err);
        exit(1);
    }
}
