/// Word ceiling for one chunk, set by the summarization model's input size.
pub const MAX_CHUNK_WORDS: usize = 512;

const SENTENCE_ENDINGS: [char; 3] = ['.', '?', '!'];

/// Splits after every `.`, `?` or `!`, keeping the mark on its sentence.
/// Whatever follows the last mark (possibly nothing) is the final element.
pub fn divide_transcript_into_sentences(transcript: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for (i, c) in transcript.char_indices() {
        if SENTENCE_ENDINGS.contains(&c) {
            let end = i + c.len_utf8();
            sentences.push(transcript[start..end].to_string());
            start = end;
        }
    }
    sentences.push(transcript[start..].to_string());
    sentences
}

/// Greedily merges consecutive sentences into chunks. A sentence joins the
/// open chunk when the chunk's word count plus the sentence's stays under
/// [`MAX_CHUNK_WORDS`]; otherwise it opens a new chunk. A single sentence
/// longer than the ceiling still becomes its own chunk.
///
/// Words are split on single spaces, so the empty token before a leading
/// space counts as a word.
pub fn combine_sentences_into_chunks<S: AsRef<str>>(sentences: &[S]) -> Vec<String> {
    let mut chunks: Vec<Vec<&str>> = Vec::new();

    for sentence in sentences {
        let words: Vec<&str> = sentence.as_ref().split(' ').collect();
        match chunks.last_mut() {
            Some(open) if open.len() + words.len() < MAX_CHUNK_WORDS => open.extend(words),
            _ => chunks.push(words),
        }
    }

    // join the words in each chunk back into a single string
    let chunks: Vec<String> = chunks
        .into_iter()
        .map(|words| words.join(" "))
        .filter(|chunk| !chunk.trim().is_empty())
        .collect();

    tracing::debug!(
        sentences = sentences.len(),
        chunks = chunks.len(),
        "sentences combined into chunks"
    );
    chunks
}
