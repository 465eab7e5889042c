//! Sentence splitting, word tokenization and syllable counting for Portuguese.

use std::sync::OnceLock;

use regex::Regex;

fn sentence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A sentence runs up to (and including) a run of terminal punctuation.
    RE.get_or_init(|| Regex::new(r"[^.!?…]+(?:[.!?…]+|$)").unwrap())
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Words may carry inner hyphens or apostrophes (guarda-chuva, d'água);
    // numbers keep their separators; anything else is one punctuation token.
    RE.get_or_init(|| {
        Regex::new(r"[\p{L}\p{M}]+(?:[-'’][\p{L}\p{M}]+)*|\d+(?:[.,]\d+)*|[^\s\p{L}\p{M}\d]")
            .unwrap()
    })
}

/// Split a paragraph into sentences.
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    sentence_regex()
        .find_iter(paragraph)
        .map(|m| m.as_str().trim())
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .map(str::to_string)
        .collect()
}

/// Split a sentence into word, number and punctuation tokens.
pub fn tokenize(sentence: &str) -> Vec<String> {
    token_regex()
        .find_iter(sentence)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| !c.is_alphanumeric())
}

fn is_vowel(c: char) -> bool {
    matches!(
        c,
        'a' | 'e' | 'i' | 'o' | 'u' | 'á' | 'é' | 'í' | 'ó' | 'ú' | 'â' | 'ê' | 'ô' | 'ã' | 'õ'
            | 'à' | 'ü' | 'y'
    )
}

/// Approximate syllable count: one per vowel group, and an accented vowel
/// next to another vowel starts its own syllable (sa-ú-de, pa-ís).
pub fn syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    let mut count = 0;
    let mut prev: Option<char> = None;

    for ch in word.chars() {
        if is_vowel(ch) {
            let hiatus = matches!(ch, 'í' | 'ú') && prev.is_some_and(is_vowel);
            if !prev.is_some_and(is_vowel) || hiatus {
                count += 1;
            }
        }
        prev = Some(ch);
    }

    count.max(1)
}
