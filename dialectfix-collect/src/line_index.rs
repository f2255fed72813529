/// 0-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

impl LineCol {
    /// 1-based form surfaced to consumers.
    pub fn one_based(self) -> (u32, u32) {
        (self.line + 1, self.column + 1)
    }
}

/// Line-break table of one file.
///
/// Offsets are byte offsets into the text. Columns count UTF-16 code units
/// from the start of the line, as editors and the TypeScript tooling do.
/// Lines end at `\n`, `\r`, `\r\n`, U+2028 and U+2029.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\r' => {
                    let end = match chars.peek() {
                        Some(&(j, '\n')) => {
                            chars.next();
                            j + 1
                        }
                        _ => i + 1,
                    };
                    line_starts.push(end);
                }
                '\n' | '\u{2028}' | '\u{2029}' => line_starts.push(i + c.len_utf8()),
                _ => {}
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Clamp `offset` into the text.
    pub fn clamp(&self, offset: usize) -> usize {
        offset.min(self.len)
    }

    /// 0-based line/column of `offset`. Offsets past the end clamp to the end.
    pub fn line_col(&self, text: &str, offset: usize) -> LineCol {
        let offset = self.clamp(offset);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(l) => l,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = match text.get(line_start..offset) {
            Some(slice) => slice.encode_utf16().count(),
            None => offset - line_start,
        };
        LineCol {
            line: line as u32,
            column: column as u32,
        }
    }
}
