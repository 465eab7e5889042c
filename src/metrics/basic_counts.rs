//! Counts of words, sentences and paragraphs, and averages over them.

use super::{ratio, Metric, MetricCategory};
use crate::error::Result;
use crate::pool::ResourcePool;
use crate::text::Text;
use crate::tokenize::syllables;

pub fn category() -> MetricCategory {
    MetricCategory::new(
        "basic_counts",
        vec![
            Box::new(Words),
            Box::new(Sentences),
            Box::new(Paragraphs),
            Box::new(WordsPerSentence),
            Box::new(SentencesPerParagraph),
            Box::new(SyllablesPerContentWord),
        ],
    )
}

pub struct Words;

impl Metric for Words {
    fn name(&self) -> &str {
        "Number of words"
    }

    fn column_name(&self) -> &str {
        "words"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        Ok(pool.words(text)?.len() as f64)
    }
}

pub struct Sentences;

impl Metric for Sentences {
    fn name(&self) -> &str {
        "Number of sentences"
    }

    fn column_name(&self) -> &str {
        "sentences"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        Ok(pool.sentences(text)?.len() as f64)
    }
}

/// Paragraphs, not counting leading titles and subtitles.
pub struct Paragraphs;

impl Metric for Paragraphs {
    fn name(&self) -> &str {
        "Number of paragraphs"
    }

    fn column_name(&self) -> &str {
        "paragraphs"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        Ok(pool.paragraphs(text)?.len() as f64)
    }
}

pub struct WordsPerSentence;

impl Metric for WordsPerSentence {
    fn name(&self) -> &str {
        "Mean words per sentence"
    }

    fn column_name(&self) -> &str {
        "words_per_sentence"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let words = pool.words(text)?.len();
        let sentences = pool.sentences(text)?.len();
        Ok(ratio(words as f64, sentences as f64))
    }
}

pub struct SentencesPerParagraph;

impl Metric for SentencesPerParagraph {
    fn name(&self) -> &str {
        "Mean sentences per paragraph"
    }

    fn column_name(&self) -> &str {
        "sentences_per_paragraph"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let sentences = pool.sentences(text)?.len();
        let paragraphs = pool.paragraphs(text)?.len();
        Ok(ratio(sentences as f64, paragraphs as f64))
    }
}

pub struct SyllablesPerContentWord;

impl Metric for SyllablesPerContentWord {
    fn name(&self) -> &str {
        "Mean syllables per content word"
    }

    fn column_name(&self) -> &str {
        "syllables_per_content_word"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let content = pool.content_words(text)?;
        let total: usize = content.iter().map(|w| syllables(w)).sum();
        Ok(ratio(total as f64, content.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{assert_close, pool, STORY};

    #[test]
    fn test_counts() {
        let pool = pool();
        let text = Text::new(STORY);
        assert_eq!(Words.value_for_text(&text, &pool).unwrap(), 12.0);
        assert_eq!(Sentences.value_for_text(&text, &pool).unwrap(), 2.0);
        assert_eq!(Paragraphs.value_for_text(&text, &pool).unwrap(), 1.0);
        assert_eq!(WordsPerSentence.value_for_text(&text, &pool).unwrap(), 6.0);
        assert_eq!(SentencesPerParagraph.value_for_text(&text, &pool).unwrap(), 2.0);
    }

    #[test]
    fn test_syllables_per_content_word() {
        let pool = pool();
        let text = Text::new(STORY);
        // me-ni-no com-prou bo-la no-va bo-la ro-lou ra-pi-da-men-te rua
        assert_close(
            SyllablesPerContentWord.value_for_text(&text, &pool).unwrap(),
            19.0 / 8.0,
        );
    }

    #[test]
    fn test_empty_text() {
        let pool = pool();
        let text = Text::new("   \n ");
        assert_eq!(WordsPerSentence.value_for_text(&text, &pool).unwrap(), 0.0);
        assert_eq!(SentencesPerParagraph.value_for_text(&text, &pool).unwrap(), 0.0);
        assert_eq!(SyllablesPerContentWord.value_for_text(&text, &pool).unwrap(), 0.0);
    }
}
