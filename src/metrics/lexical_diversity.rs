//! Lexical diversity: type-token ratios, windowed (MATTR) variants and density.

use std::collections::HashSet;

use super::{ratio, zero_if_empty, Metric, MetricCategory};
use crate::error::Result;
use crate::mattr::{mattr, mattr_relative};
use crate::nlp::{ADJECTIVE_TAGS, ADVERB_TAGS, NOUN_TAGS, VERB_TAGS};
use crate::pool::ResourcePool;
use crate::text::Text;

pub fn category() -> MetricCategory {
    MetricCategory::new(
        "lexical_diversity",
        vec![
            Box::new(TypeTokenRatio),
            Box::new(Mattr::new("MATTR of all words", "mattr", Tokens::AllWords)),
            Box::new(Mattr::new("MATTR of content words", "content_mattr", Tokens::ContentWords)),
            Box::new(Mattr::new("MATTR of nouns", "noun_mattr", Tokens::Tagged(NOUN_TAGS))),
            Box::new(Mattr::new("MATTR of verbs", "verb_mattr", Tokens::Tagged(VERB_TAGS))),
            Box::new(Mattr::new(
                "MATTR of adjectives",
                "adjective_mattr",
                Tokens::Tagged(ADJECTIVE_TAGS),
            )),
            Box::new(Mattr::new("MATTR of adverbs", "adverb_mattr", Tokens::Tagged(ADVERB_TAGS))),
            Box::new(Mattr::new(
                "MATTR of content word lemmas",
                "content_lemma_mattr",
                Tokens::ContentLemmas,
            )),
            Box::new(SimpleWordsMattr),
            Box::new(LexicalDensity),
        ],
    )
}

pub struct TypeTokenRatio;

impl Metric for TypeTokenRatio {
    fn name(&self) -> &str {
        "Type-token ratio"
    }

    fn column_name(&self) -> &str {
        "ttr"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let types = pool.word_types(text)?.len();
        let tokens = pool.all_words(text)?.len();
        Ok(ratio(types as f64, tokens as f64))
    }
}

/// Which tokens a diversity statistic runs over.
#[derive(Debug, Clone, Copy)]
pub enum Tokens {
    AllWords,
    ContentWords,
    /// Lower-cased words carrying one of these tags.
    Tagged(&'static [&'static str]),
    ContentLemmas,
}

impl Tokens {
    fn collect(self, text: &Text, pool: &ResourcePool) -> Result<Vec<String>> {
        Ok(match self {
            Tokens::AllWords => pool.all_words(text)?.to_vec(),
            Tokens::ContentWords => pool.content_words(text)?.to_vec(),
            Tokens::ContentLemmas => pool.content_word_lemmas(text)?.to_vec(),
            Tokens::Tagged(tags) => pool
                .tagged_words(text)?
                .iter()
                .filter(|t| tags.contains(&t.tag.as_str()))
                .map(|t| t.word.to_lowercase())
                .collect(),
        })
    }
}

pub struct Mattr {
    name: &'static str,
    column: &'static str,
    tokens: Tokens,
}

impl Mattr {
    pub fn new(name: &'static str, column: &'static str, tokens: Tokens) -> Self {
        Mattr {
            name,
            column,
            tokens,
        }
    }
}

impl Metric for Mattr {
    fn name(&self) -> &str {
        self.name
    }

    fn column_name(&self) -> &str {
        self.column
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let window = pool.config()?.mattr_window;
        let tokens = self.tokens.collect(text, pool)?;
        zero_if_empty(mattr(&tokens, window))
    }
}

/// Windowed share of words found in the simple-words list.
pub struct SimpleWordsMattr;

impl Metric for SimpleWordsMattr {
    fn name(&self) -> &str {
        "MATTR of simple words"
    }

    fn column_name(&self) -> &str {
        "simple_words_mattr"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let window = pool.config()?.mattr_window;
        let words = pool.all_words(text)?;
        let simple = pool.simple_words()?;
        let filter: HashSet<&str> = simple.entries().iter().map(String::as_str).collect();
        let tokens: Vec<&str> = words.iter().map(String::as_str).collect();
        zero_if_empty(mattr_relative(&tokens, &filter, window))
    }
}

/// Content words over all words.
pub struct LexicalDensity;

impl Metric for LexicalDensity {
    fn name(&self) -> &str {
        "Lexical density"
    }

    fn column_name(&self) -> &str {
        "content_density"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let content = pool.content_words(text)?.len();
        let words = pool.words(text)?.len();
        Ok(ratio(content as f64, words as f64))
    }
}
