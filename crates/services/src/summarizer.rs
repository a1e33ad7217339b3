//! Extractive summarization: picks the highest-scoring sentences of a text by
//! length-normalized word frequency.

use std::collections::HashMap;

const AD_HOC_STOP_WORDS: &[&str] = &[
    "the", "and", "a", "an", "to", "of", "in", "is", "it", "that", "for", "on", "with", "as",
    "are", "was", "be",
];

/// Spoken transcripts are full of first/second person filler, so they get a
/// slightly larger stop-word set.
const TRANSCRIPT_STOP_WORDS: &[&str] = &[
    "the", "and", "a", "an", "to", "of", "in", "is", "it", "that", "for", "on", "with", "as",
    "are", "was", "be", "this", "you", "i",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryProfile {
    /// Meeting voice transcript (`stt:summary`).
    Transcript,
    /// Arbitrary client-supplied text (`ai:summarize`).
    AdHoc,
}

impl SummaryProfile {
    /// Sentences considered for selection.
    fn max_sentences(self) -> usize {
        match self {
            SummaryProfile::Transcript => 80,
            SummaryProfile::AdHoc => 30,
        }
    }

    /// Upper bound on sentences in the summary.
    fn max_picks(self) -> usize {
        match self {
            SummaryProfile::Transcript => 6,
            SummaryProfile::AdHoc => 5,
        }
    }

    fn stop_words(self) -> &'static [&'static str] {
        match self {
            SummaryProfile::Transcript => TRANSCRIPT_STOP_WORDS,
            SummaryProfile::AdHoc => AD_HOC_STOP_WORDS,
        }
    }
}

/// Summarizes `text`. Blank input yields an empty summary.
pub fn summarize(text: &str, profile: SummaryProfile) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let stop_words = profile.stop_words();
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in normalize_words(text) {
        if !stop_words.contains(&word.as_str()) {
            *freq.entry(word).or_default() += 1;
        }
    }

    let mut scored: Vec<(&str, f64)> = split_sentences(text)
        .into_iter()
        .take(profile.max_sentences())
        .map(|sentence| {
            let words = normalize_words(sentence);
            let total: usize = words.iter().map(|w| freq.get(w).copied().unwrap_or(0)).sum();
            let divisor = (words.len().max(1) as f64).sqrt();
            (sentence, total as f64 / divisor)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));

    let picks = scored
        .len()
        .div_ceil(3)
        .clamp(2, profile.max_picks());

    scored
        .iter()
        .take(picks)
        .map(|(sentence, _)| sentence.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits after `.`, `!` or `?` wherever a whitespace run follows. The
/// whitespace itself is dropped; the punctuation stays with its sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            sentences.push(&text[start..idx]);
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    sentences.push(&text[start..]);
    sentences
}

/// Lowercases, replaces everything outside `[a-z0-9]` and whitespace with a
/// space, and splits into words.
fn normalize_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}
