//! Readability indices.

use super::{ratio, Metric, MetricCategory};
use crate::error::Result;
use crate::pool::ResourcePool;
use crate::text::Text;

pub fn category() -> MetricCategory {
    MetricCategory::new(
        "readability",
        vec![Box::new(FleschIndex), Box::new(FrequencyReadability)],
    )
}

/// Flesch Reading Ease adapted to Portuguese (Martins et al., 1996).
/// Higher is easier; 0 for a text without words.
pub struct FleschIndex;

impl Metric for FleschIndex {
    fn name(&self) -> &str {
        "Flesch index"
    }

    fn column_name(&self) -> &str {
        "flesch"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let syllables = pool.syllables_per_word(text)?;
        let sentences = pool.sentences(text)?.len();
        if syllables.is_empty() || sentences == 0 {
            return Ok(0.0);
        }

        let words = syllables.len() as f64;
        let words_per_sentence = words / sentences as f64;
        let syllables_per_word = syllables.iter().sum::<usize>() as f64 / words;

        Ok(248.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word)
    }
}

/// Mean corpus weight of the text's words: each word weighs its corpus
/// count over the corpus's largest count, unknown words weigh 0.
/// Closer to 1 means the text is made of very common words.
pub struct FrequencyReadability;

impl Metric for FrequencyReadability {
    fn name(&self) -> &str {
        "Mean normalized word frequency"
    }

    fn column_name(&self) -> &str {
        "frequency_readability"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let words = pool.all_words(text)?;
        let corpus = pool.frequency_corpus()?;
        let sum: f64 = words.iter().map(|w| corpus.weight(w)).sum();
        Ok(ratio(sum, words.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::FrequencyCorpus;
    use crate::metrics::fixtures::{assert_close, pool, STORY};
    use crate::pool::resources::FREQUENCY_CORPUS;

    #[test]
    fn test_flesch() {
        let pool = pool();
        let text = Text::new(STORY);
        // 12 words, 2 sentences, 25 syllables.
        let expected = 248.835 - 1.015 * 6.0 - 84.6 * 25.0 / 12.0;
        assert_close(FleschIndex.value_for_text(&text, &pool).unwrap(), expected);
    }

    #[test]
    fn test_flesch_without_words() {
        let pool = pool();
        assert_eq!(FleschIndex.value_for_text(&Text::new(""), &pool).unwrap(), 0.0);
    }

    #[test]
    fn test_frequency_readability() {
        let mut pool = pool();
        pool.register(FREQUENCY_CORPUS, true, |_, _| {
            Ok(FrequencyCorpus::from_counts([
                ("gato".to_string(), 1000),
                ("dorme".to_string(), 10),
            ]))
        });
        let text = Text::new("O gato dorme.");
        assert_close(
            FrequencyReadability.value_for_text(&text, &pool).unwrap(),
            (0.0 + 1.0 + 0.01) / 3.0,
        );
    }
}
