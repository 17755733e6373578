//! Styled line representation
//!
//! A line is an ordered run of chunks. Each chunk is a contiguous span of
//! columns rendered with a single style. Columns are counted in bytes.
//!
//! Invariants kept by every mutator:
//! - no chunk is empty
//! - no two neighbouring chunks have equal styles

use std::borrow::Cow;

use super::Style;

/// Shared padding to avoid allocating for common gap sizes
static SPACES: [u8; 256] = [b' '; 256];

/// A run of bytes sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub data: Vec<u8>,
    pub style: Style,
}

impl Chunk {
    pub fn new(data: impl Into<Vec<u8>>, style: Style) -> Self {
        Self {
            data: data.into(),
            style,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Chunk content as text, replacing invalid UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// A row of styled chunks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    chunks: Vec<Chunk>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a line from chunks, restoring the line invariants
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        let mut line = Self { chunks };
        line.coalesce();
        line
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Number of occupied columns
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Chunk::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The rendered row content, without styling
    pub fn text(&self) -> String {
        let bytes: Vec<u8> = self
            .chunks
            .iter()
            .flat_map(|chunk| chunk.data.iter().copied())
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Write `data` starting at column `col`, overwriting whatever is there.
    /// Writing past the end pads the gap with spaces.
    pub fn print(&mut self, col: usize, data: &[u8], style: Style) {
        if data.is_empty() {
            return;
        }
        let len = self.len();
        if col >= len {
            self.append(col - len, data, style);
        } else {
            self.overwrite(col, data, style);
            self.coalesce();
        }
    }

    /// Drop everything at or after column `col`
    pub fn clear_right(&mut self, col: usize) {
        let mut chunk_end = 0;
        for i in 0..self.chunks.len() {
            let chunk_start = chunk_end;
            chunk_end += self.chunks[i].len();
            if chunk_end < col {
                continue;
            }
            self.chunks[i].data.truncate(col - chunk_start);
            let keep = if self.chunks[i].is_empty() { i } else { i + 1 };
            self.chunks.truncate(keep);
            return;
        }
    }

    fn append(&mut self, gap: usize, data: &[u8], style: Style) {
        match self.chunks.last_mut() {
            Some(last) => {
                // the gap takes the style of whatever precedes it
                pad(&mut last.data, gap);
                if last.style == style {
                    last.data.extend_from_slice(data);
                    return;
                }
            }
            None => {
                let mut padded = Vec::with_capacity(gap + data.len());
                pad(&mut padded, gap);
                padded.extend_from_slice(data);
                self.chunks.push(Chunk::new(padded, style));
                return;
            }
        }
        self.chunks.push(Chunk::new(data, style));
    }

    /// Write within existing content. `col` is known to be inside the line.
    fn overwrite(&mut self, col: usize, data: &[u8], style: Style) {
        let end = col + data.len();

        let mut chunk_start = 0;
        let mut index = 0;
        while index < self.chunks.len() {
            let chunk_end = chunk_start + self.chunks[index].len();
            if col < chunk_end {
                break;
            }
            chunk_start = chunk_end;
            index += 1;
        }
        let chunk_end = chunk_start + self.chunks[index].len();
        let rel = col - chunk_start;

        if end <= chunk_end {
            self.overwrite_inside(index, rel, data, style);
            return;
        }

        // The write runs past this chunk: cut it at `rel`, place the data,
        // then eat into the following chunks.
        let tail = self.chunks.split_off(index + 1);
        if let Some(mut first) = self.chunks.pop() {
            first.data.truncate(rel);
            if first.style == style {
                first.data.extend_from_slice(data);
                self.chunks.push(first);
            } else {
                if !first.is_empty() {
                    self.chunks.push(first);
                }
                self.chunks.push(Chunk::new(data, style));
            }
        }

        let mut remaining = end - chunk_end;
        let mut rest = tail.into_iter();
        for mut chunk in rest.by_ref() {
            if remaining >= chunk.len() {
                remaining -= chunk.len();
                continue;
            }
            chunk.data.drain(..remaining);
            self.chunks.push(chunk);
            break;
        }
        self.chunks.extend(rest);
    }

    /// The write fits entirely inside chunk `index`
    fn overwrite_inside(&mut self, index: usize, rel: usize, data: &[u8], style: Style) {
        let chunk = &mut self.chunks[index];
        if chunk.style == style {
            chunk.data[rel..rel + data.len()].copy_from_slice(data);
            return;
        }

        let right = chunk.data.split_off(rel + data.len());
        chunk.data.truncate(rel);
        let old_style = chunk.style;

        let mut pieces = Vec::with_capacity(3);
        if rel > 0 {
            pieces.push(Chunk::new(std::mem::take(&mut chunk.data), old_style));
        }
        pieces.push(Chunk::new(data, style));
        if !right.is_empty() {
            pieces.push(Chunk::new(right, old_style));
        }
        self.chunks.splice(index..=index, pieces);
    }

    /// Merge neighbouring chunks with equal styles and drop empty ones
    fn coalesce(&mut self) {
        let mut merged: Vec<Chunk> = Vec::with_capacity(self.chunks.len());
        for chunk in self.chunks.drain(..) {
            if chunk.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.style == chunk.style => prev.data.extend_from_slice(&chunk.data),
                _ => merged.push(chunk),
            }
        }
        self.chunks = merged;
    }
}

/// A run of `count` spaces, borrowed from the shared padding when it fits
pub(crate) fn blank(count: usize) -> Cow<'static, [u8]> {
    match SPACES.get(..count) {
        Some(spaces) => Cow::Borrowed(spaces),
        None => Cow::Owned(vec![b' '; count]),
    }
}

/// Append `count` spaces to `buf`
pub(crate) fn pad(buf: &mut Vec<u8>, mut count: usize) {
    buf.reserve(count);
    while count > 0 {
        let n = count.min(SPACES.len());
        buf.extend_from_slice(&SPACES[..n]);
        count -= n;
    }
}
