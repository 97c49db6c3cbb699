use serde::Serialize;

/// Zero-based line/character position.
///
/// `character` counts UTF-16 code units, the unit editors use for columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Range between two positions. `contains` includes both ends, matching how
/// editors report a cursor sitting right after a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

/// Line start offsets of a text, for byte offset <-> position conversion.
///
/// Built from the full text of the file, markup included, so positions
/// always refer to what the user sees.
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: String,
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            text: text.to_string(),
            line_starts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Converts a byte offset to a position. Offsets past the end clamp to the
    /// end of the text; offsets inside a multibyte character round down.
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line - 1,
        };
        let line_start = self.line_starts[line];
        let character: usize = self.text[line_start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position::new(line as u32, character as u32)
    }

    /// Converts a position back to a byte offset. Characters past the end of a
    /// line clamp to the line end; lines past the end of the text yield `None`.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = *self.line_starts.get(line)?;
        let line_end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());

        let mut units = 0u32;
        for (i, c) in self.text[line_start..line_end].char_indices() {
            if units >= position.character {
                return Some(line_start + i);
            }
            units += c.len_utf16() as u32;
        }
        Some(line_end)
    }

    pub fn range(&self, start: usize, end: usize) -> Range {
        Range::new(self.position_at(start), self.position_at(end))
    }
}
