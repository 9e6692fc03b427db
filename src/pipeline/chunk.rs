//! Partitioning: split the document text into bounded chunks.
//!
//! Offsets and lengths count Unicode scalar values (`char`s), never bytes,
//! so a chunk boundary can never land inside a multi-byte character. Each
//! [`Chunk`] borrows its slice from the document text; nothing is copied.
//!
//! Concatenating the chunks in order always reproduces the input exactly,
//! whichever [`ChunkStrategy`] is used.

use crate::config::ChunkStrategy;

/// A contiguous slice of the document text handed to one capability call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 0-indexed position in the chunk sequence.
    pub index: usize,
    /// Character offset of the first character in the full text.
    pub offset: usize,
    /// Number of characters in `text`.
    pub len: usize,
    pub text: &'a str,
}

/// Split `text` into chunks of at most `chunk_size` characters.
///
/// Empty input yields no chunks. A `chunk_size` of 0 is treated as 1;
/// [`crate::config::SummaryConfig::validate`] rejects it before it gets here.
pub fn chunk_text(text: &str, chunk_size: usize, strategy: ChunkStrategy) -> Vec<Chunk<'_>> {
    let size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(text.len() / size + 1);
    let mut rest = text;
    let mut offset = 0;

    while !rest.is_empty() {
        let window_end = rest
            .char_indices()
            .nth(size)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let cut = match strategy {
            ChunkStrategy::Fixed => window_end,
            ChunkStrategy::Boundary if window_end < rest.len() => {
                boundary_cut(&rest[..window_end], size.div_ceil(2)).unwrap_or(window_end)
            }
            ChunkStrategy::Boundary => window_end,
        };

        let (head, tail) = rest.split_at(cut);
        let len = head.chars().count();
        chunks.push(Chunk {
            index: chunks.len(),
            offset,
            len,
            text: head,
        });
        offset += len;
        rest = tail;
    }

    chunks
}

/// Find the byte index just past the last sentence break (or, failing that,
/// the last whitespace) in `window`, considering only cuts that keep at
/// least `min_chars` characters in the chunk.
fn boundary_cut(window: &str, min_chars: usize) -> Option<usize> {
    let mut sentence = None;
    let mut space = None;
    let mut prev = None;

    for (count, (i, c)) in window.char_indices().enumerate() {
        if c.is_whitespace() && count + 1 >= min_chars {
            let end = i + c.len_utf8();
            space = Some(end);
            if matches!(prev, Some('.' | '!' | '?')) {
                sentence = Some(end);
            }
        }
        prev = Some(c);
    }

    sentence.or(space)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(chunks: &[Chunk<'_>]) -> String {
        chunks.iter().map(|c| c.text).collect()
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_text("", 10, ChunkStrategy::Fixed).is_empty());
        assert!(chunk_text("", 10, ChunkStrategy::Boundary).is_empty());
    }

    #[test]
    fn fixed_chunks_cover_input_exactly() {
        let text: String = (0..257).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        for size in [1, 2, 7, 64, 256, 257, 1000] {
            let chunks = chunk_text(&text, size, ChunkStrategy::Fixed);
            assert_eq!(rejoin(&chunks), text, "size {size}");
            assert_eq!(chunks.len(), text.len().div_ceil(size), "size {size}");
            for w in chunks.windows(2) {
                assert_eq!(w[0].offset + w[0].len, w[1].offset);
            }
        }
    }

    #[test]
    fn spec_example_lengths() {
        let text = "x".repeat(2500);
        let lens: Vec<usize> = chunk_text(&text, 1024, ChunkStrategy::Fixed)
            .iter()
            .map(|c| c.len)
            .collect();
        assert_eq!(lens, vec![1024, 1024, 452]);
    }

    #[test]
    fn fixed_split_ignores_word_boundaries() {
        let chunks = chunk_text("hello world", 4, ChunkStrategy::Fixed);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["hell", "o wo", "rld"]);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let text = "héllo wörld ünïcode";
        let chunks = chunk_text(text, 5, ChunkStrategy::Fixed);
        assert_eq!(rejoin(&chunks), text);
        assert_eq!(chunks[1].offset, 5);
        assert!(chunks.iter().all(|c| c.len <= 5));
        assert_eq!(chunks.len(), text.chars().count().div_ceil(5));
    }

    #[test]
    fn boundary_prefers_sentence_end() {
        let text = "One two. Three four five six seven";
        let chunks = chunk_text(text, 16, ChunkStrategy::Boundary);
        assert_eq!(chunks[0].text, "One two. ");
        assert_eq!(rejoin(&chunks), text);
        assert!(chunks.iter().all(|c| c.len <= 16));
    }

    #[test]
    fn boundary_falls_back_to_whitespace() {
        let text = "alpha beta gamma delta";
        let chunks = chunk_text(text, 12, ChunkStrategy::Boundary);
        assert_eq!(chunks[0].text, "alpha beta ");
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn boundary_without_whitespace_cuts_at_window() {
        let text = "a".repeat(30);
        let chunks = chunk_text(&text, 10, ChunkStrategy::Boundary);
        assert_eq!(chunks.len(), 3);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn boundary_ignores_breaks_in_first_half() {
        // The only space sits at character 2 of a 10-character window.
        let text = "ab cdefghijklmnop";
        let chunks = chunk_text(text, 10, ChunkStrategy::Boundary);
        assert_eq!(chunks[0].len, 10);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn short_text_is_single_chunk() {
        let chunks = chunk_text("short", 1024, ChunkStrategy::Boundary);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short");
        assert_eq!(chunks[0].offset, 0);
    }
}
