/// A window of consecutive words from an extracted document.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    pub index: usize,
    pub text: String,
    pub word_count: usize,
}

/// Splits text into fixed-size word windows where consecutive windows share
/// `chunk_overlap` words.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split(&self, text: &str) -> Vec<TextChunk> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut chunks = Vec::new();

        if words.is_empty() {
            return chunks;
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut start = 0;

        loop {
            let end = std::cmp::min(start + self.chunk_size, words.len());

            chunks.push(TextChunk {
                index: chunks.len(),
                text: words[start..end].join(" "),
                word_count: end - start,
            });

            if end >= words.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}
