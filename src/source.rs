use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

/// A unique identifier for a loaded input file.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct FileId(pub u32);

impl Display for FileId {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(fmt, "FileId({})", self.0)
    }
}

/// A single source location: file plus byte offset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SourceLocation {
    pub file_id: FileId,
    pub offset: u32,
}

impl SourceLocation {
    pub fn new(file_id: FileId, offset: u32) -> Self {
        Self { file_id, offset }
    }
}

/// Represents a span in a source file.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        assert_eq!(start.file_id, end.file_id, "Span across files not allowed");
        Self { start, end }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn file_id(&self) -> FileId {
        self.start.file_id
    }

    pub fn start_offset(&self) -> u32 {
        self.start.offset
    }

    pub fn end_offset(&self) -> u32 {
        self.end.offset
    }

    pub fn merge(&self, other: SourceSpan) -> SourceSpan {
        SourceSpan::new(self.start, other.end)
    }
}

impl Debug for SourceSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SourceSpan(fileid={}, offset={}..{})",
            self.start.file_id.0, self.start.offset, self.end.offset
        )
    }
}

/// Represents a single loaded source file with precomputed line positions.
#[derive(Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub name: PathBuf,
    pub content: String,
    pub line_starts: Vec<u32>, // offset of each line
}

impl SourceFile {
    pub fn new(id: FileId, name: PathBuf, content: String) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            id,
            name,
            content,
            line_starts,
        }
    }

    pub fn lookup_line_col(&self, offset: u32) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(l) => l,
            Err(next) => next.saturating_sub(1),
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col + 1)
    }
}

/// Central registry for all source files.
#[derive(Default, Clone)]
pub struct SourceMap {
    pub files: HashMap<FileId, SourceFile>,
    next_id: u32,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file and returns its id.
    pub fn add(&mut self, name: PathBuf, content: String) -> FileId {
        let id = FileId(self.next_id);
        self.next_id += 1;
        self.files.insert(id, SourceFile::new(id, name, content));
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(&id)
    }

    pub fn lookup_line_col(&self, file_id: FileId, offset: u32) -> Option<(u32, u32)> {
        self.files.get(&file_id).map(|f| f.lookup_line_col(offset))
    }

    pub fn path_of(&self, file_id: FileId) -> Option<&PathBuf> {
        self.files.get(&file_id).map(|f| &f.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_loc_equality() {
        let a = SourceLocation::new(FileId(0), 10);
        let b = SourceLocation::new(FileId(0), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn line_col_lookup() {
        let file = SourceFile::new(FileId(0), "a.h".into(), "ab\ncd\n".to_string());
        assert_eq!(file.lookup_line_col(0), (1, 1));
        assert_eq!(file.lookup_line_col(1), (1, 2));
        assert_eq!(file.lookup_line_col(3), (2, 1));
        assert_eq!(file.lookup_line_col(4), (2, 2));
    }
}
