//! The printer-flag contract shared by the generated C and the tests.
//!
//! Generated `<name>_fpr` functions select a format through a flags
//! argument: `Default` and `Yaml` share the YAML renderer, `Json` is
//! recognized but deliberately unimplemented, and any other value gets
//! the same "not implemented" answer. [`dispatch`] mirrors that control
//! flow so the policy is testable without compiling the emitted C.

use std::io::{self, Write};

/// Flag values, matching the generated `enum <name>_pr`.
pub const PR_DEF: i32 = 0x0;
pub const PR_YAML: i32 = 0x1;
pub const PR_JSON: i32 = 0x2;

/// `ENOSYS`; the generated code returns `-ENOSYS` for unimplemented
/// formats.
pub const ENOSYS: i32 = 38;

/// The closed set of output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintFormat {
    Default,
    Yaml,
    Json,
}

impl PrintFormat {
    /// Maps a flags value to its format. Unknown values map to nothing
    /// rather than degrading to a default.
    pub fn from_flags(flags: i32) -> Option<PrintFormat> {
        match flags {
            f if f == PR_DEF => Some(PrintFormat::Default),
            f if f == PR_YAML => Some(PrintFormat::Yaml),
            f if f == PR_JSON => Some(PrintFormat::Json),
            _ => None,
        }
    }
}

/// The line a YAML renderer emits for a null object pointer.
pub fn null_object_line(name: &str) -> String {
    format!("{}: ~\n", name)
}

/// Runs `yaml` against `stream` under the generated dispatch policy and
/// returns what the C function would: characters written on success, a
/// negative code otherwise. `Json` and unrecognized flags write nothing.
pub fn dispatch<W: Write>(
    stream: &mut W,
    flags: i32,
    yaml: impl FnOnce(&mut W) -> io::Result<usize>,
) -> i32 {
    match PrintFormat::from_flags(flags) {
        Some(PrintFormat::Default) | Some(PrintFormat::Yaml) => match yaml(stream) {
            Ok(written) => written as i32,
            Err(_) => -1,
        },
        Some(PrintFormat::Json) | None => -ENOSYS,
    }
}

/// The null-object fast path of a generated `_fpr`: emits `<name>: ~`
/// and reports the character count, newline included.
pub fn write_null_object<W: Write>(stream: &mut W, name: &str) -> io::Result<usize> {
    let line = null_object_line(name);
    stream.write_all(line.as_bytes())?;
    Ok(line.len())
}
