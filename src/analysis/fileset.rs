//! File set: every parsed file gets a base offset so a single `Pos` value
//! identifies a byte in any file, and can be turned back into a file name
//! and line number.

/// Global position inside a [`FileSet`]. `Pos::NONE` means "no position".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos(pub usize);

impl Pos {
    pub const NONE: Pos = Pos(0);

    pub fn is_valid(self) -> bool {
        self != Pos::NONE
    }
}

/// Half-open range `[start, end)` of positions within one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

/// Resolved position: file name plus 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub filename: String,
    pub line: usize,
}

#[derive(Debug)]
struct File {
    name: String,
    base: usize,
    src: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<usize>,
}

impl File {
    fn contains(&self, pos: Pos) -> bool {
        pos.0 >= self.base && pos.0 <= self.base + self.src.len()
    }

    fn offset(&self, pos: Pos) -> usize {
        pos.0 - self.base
    }
}

#[derive(Debug, Default)]
pub struct FileSet {
    files: Vec<File>,
}

impl FileSet {
    /// Register a file and return its base. Byte offset `n` of the file has
    /// position `Pos(base + n)`.
    pub fn add_file(&mut self, name: impl Into<String>, src: String) -> usize {
        // +1 leaves room for the end-of-file position between files
        let base = self
            .files
            .last()
            .map(|f| f.base + f.src.len() + 1)
            .unwrap_or(1);
        let mut line_starts = vec![0];
        line_starts.extend(src.match_indices('\n').map(|(i, _)| i + 1));
        self.files.push(File {
            name: name.into(),
            base,
            src,
            line_starts,
        });
        base
    }

    fn file(&self, pos: Pos) -> Option<&File> {
        if !pos.is_valid() {
            return None;
        }
        let idx = self.files.partition_point(|f| f.base <= pos.0);
        let file = self.files.get(idx.checked_sub(1)?)?;
        file.contains(pos).then_some(file)
    }

    pub fn position(&self, pos: Pos) -> Option<Position> {
        let file = self.file(pos)?;
        let offset = file.offset(pos);
        let line = file.line_starts.partition_point(|&start| start <= offset);
        Some(Position {
            filename: file.name.clone(),
            line,
        })
    }

    /// Source text covered by `span`, if both ends lie in the same file.
    pub fn text(&self, span: Span) -> Option<&str> {
        let file = self.file(span.start)?;
        if !file.contains(span.end) || span.end < span.start {
            return None;
        }
        file.src.get(file.offset(span.start)..file.offset(span.end))
    }

    /// Leading whitespace of the line holding `pos`.
    pub fn line_indent(&self, pos: Pos) -> Option<&str> {
        let file = self.file(pos)?;
        let offset = file.offset(pos);
        let line = file.line_starts.partition_point(|&start| start <= offset);
        let rest = &file.src[file.line_starts[line - 1]..];
        let width = rest
            .bytes()
            .take_while(|b| *b == b' ' || *b == b'\t')
            .count();
        Some(&rest[..width])
    }
}
