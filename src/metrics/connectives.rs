//! Incidence of connectives and indefinite pronouns, per thousand words.

use std::rc::Rc;

use super::{incidence, Metric, MetricCategory};
use crate::error::Result;
use crate::lexicon::WordList;
use crate::pool::ResourcePool;
use crate::text::Text;

pub fn category() -> MetricCategory {
    MetricCategory::new(
        "connectives",
        vec![
            Box::new(ListIncidence::new(
                "Discourse marker incidence",
                "discourse_markers_incidence",
                ResourcePool::discourse_markers,
            )),
            Box::new(ListIncidence::new(
                "Conjunction incidence",
                "conjunctions_incidence",
                ResourcePool::conjunctions,
            )),
            Box::new(ListIncidence::new(
                "Indefinite pronoun incidence",
                "indefinite_pronouns_incidence",
                ResourcePool::indefinite_pronouns,
            )),
        ],
    )
}

type ListAccessor = fn(&ResourcePool) -> Result<Rc<WordList>>;

/// Occurrences of a word list's entries per thousand words.
/// Multi-word entries match as token sequences within a sentence.
pub struct ListIncidence {
    name: &'static str,
    column: &'static str,
    list: ListAccessor,
}

impl ListIncidence {
    pub fn new(name: &'static str, column: &'static str, list: ListAccessor) -> Self {
        ListIncidence { name, column, list }
    }
}

impl Metric for ListIncidence {
    fn name(&self) -> &str {
        self.name
    }

    fn column_name(&self) -> &str {
        self.column
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let phrases = (self.list)(pool)?.phrases();
        let sentences = pool.tokenized_sentences(text)?;
        let count: usize = sentences
            .iter()
            .map(|tokens| {
                let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
                count_phrases(&lowered, &phrases)
            })
            .sum();
        let words = pool.words(text)?.len();
        Ok(incidence(count, words))
    }
}

/// Non-overlapping matches, preferring the longest phrase at each position.
/// `phrases` must be sorted longest first.
fn count_phrases(tokens: &[String], phrases: &[Vec<String>]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < tokens.len() {
        match phrases.iter().find(|p| tokens[i..].starts_with(p)) {
            Some(phrase) => {
                count += 1;
                i += phrase.len().max(1);
            }
            None => i += 1,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{assert_close, pool};

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_count_phrases_prefers_longest() {
        let phrases = WordList::from_entries(["por", "por outro lado", "lado"]).phrases();
        assert_eq!(count_phrases(&tokens("por outro lado ele saiu por lá"), &phrases), 2);
    }

    #[test]
    fn test_incidences() {
        let pool = pool();
        let text = Text::new("Além disso, o menino correu e caiu. Porém ninguém viu.");
        // 10 words
        let set = category();
        let values: Vec<f64> = set
            .metrics
            .iter()
            .map(|m| m.value_for_text(&text, &pool).unwrap())
            .collect();
        assert_close(values[0], 100.0);
        assert_close(values[1], 200.0);
        assert_close(values[2], 100.0);
    }
}
