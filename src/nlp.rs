//! Interfaces to the external NLP tools the pool builds on, plus small
//! lexicon-backed defaults for tagging and lemmatization.
//!
//! Tags follow the MAC-Morpho tagset (`N`, `V`, `ADJ`, `ADV`, `ART`, `PREP`,
//! `KC`, `KS`, `PROPESS`, `NPROP`, `NUM`, `PU`, ...).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::tokenize::is_punctuation;

pub const NOUN_TAGS: &[&str] = &["N"];
pub const VERB_TAGS: &[&str] = &["V", "PCP"];
pub const ADJECTIVE_TAGS: &[&str] = &["ADJ"];
pub const ADVERB_TAGS: &[&str] = &["ADV"];
pub const PUNCTUATION_TAG: &str = "PU";

pub fn is_content_tag(tag: &str) -> bool {
    [NOUN_TAGS, VERB_TAGS, ADJECTIVE_TAGS, ADVERB_TAGS]
        .iter()
        .any(|tags| tags.contains(&tag))
}

/// A token with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedWord {
    pub word: String,
    pub tag: String,
}

impl TaggedWord {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        TaggedWord {
            word: word.into(),
            tag: tag.into(),
        }
    }

    pub fn is_punctuation(&self) -> bool {
        self.tag == PUNCTUATION_TAG
    }

    pub fn is_content_word(&self) -> bool {
        is_content_tag(&self.tag)
    }
}

/// One token of a dependency parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyToken {
    pub form: String,
    /// 1-based index of the head token; 0 marks the root.
    pub head: usize,
    pub relation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTree {
    pub tokens: Vec<DependencyToken>,
}

impl DependencyTree {
    /// Sum of `|index - head|` over non-root tokens and the number of such arcs.
    pub fn arc_lengths(&self) -> (usize, usize) {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.head != 0)
            .fold((0, 0), |(sum, arcs), (i, t)| {
                (sum + (i + 1).abs_diff(t.head), arcs + 1)
            })
    }
}

/// Part-of-speech tagger over tokenized sentences.
pub trait Tagger {
    fn tag_sents(&self, sentences: &[Vec<String>]) -> Result<Vec<Vec<TaggedWord>>>;
}

/// Dependency parser over tokenized sentences.
pub trait DependencyParser {
    fn parse_sents(&self, sentences: &[Vec<String>]) -> Result<Vec<DependencyTree>>;
}

/// Lemma lookup for an inflected form.
pub trait Lemmatizer {
    fn get_lemma(&self, word: &str, tag: &str) -> Option<String>;
}

/// Parser that returns PALAVRAS-style flat output for a whole text:
/// one token per line, `form [lemma] <secondary> POS @FUNCTION`.
pub trait FlatParser {
    fn parse(&self, raw_text: &str) -> Result<String>;
}

const CLOSED_CLASS: &[(&str, &[&str])] = &[
    ("ART", &["o", "a", "os", "as", "um", "uma", "uns", "umas"]),
    (
        "PREP",
        &[
            "de", "em", "para", "por", "com", "sem", "sob", "entre", "até", "desde", "do", "da",
            "dos", "das", "no", "na", "nas", "ao", "aos", "à", "às", "pelo", "pela", "pelos",
            "pelas", "num", "numa", "dum", "duma",
        ],
    ),
    ("KC", &["e", "ou", "mas", "nem", "porém"]),
    ("KS", &["que", "se", "porque", "quando", "embora", "como"]),
    (
        "PROPESS",
        &[
            "eu", "tu", "ele", "ela", "nós", "vós", "eles", "elas", "você", "vocês", "me", "te",
            "lhe", "lhes",
        ],
    ),
];

/// Unigram tagger: lexicon lookup with suffix heuristics for unknown words.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    lexicon: HashMap<String, String>,
}

impl LexiconTagger {
    pub fn new(lexicon: HashMap<String, String>) -> Self {
        let lexicon = lexicon
            .into_iter()
            .map(|(w, t)| (w.to_lowercase(), t))
            .collect();
        LexiconTagger { lexicon }
    }

    /// Tagger seeded with Portuguese articles, prepositions, conjunctions
    /// and personal pronouns, so function words are not guessed as nouns.
    pub fn closed_class() -> Self {
        let lexicon = CLOSED_CLASS
            .iter()
            .flat_map(|(tag, words)| words.iter().map(|w| (w.to_string(), tag.to_string())))
            .collect();
        LexiconTagger { lexicon }
    }

    /// `word<TAB>tag` per line.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not open tagger lexicon: {}", path.display()))?;
        let mut lexicon = HashMap::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (word, tag) = line
                .split_once('\t')
                .with_context(|| format!("{}:{}: expected word<TAB>tag", path.display(), lineno + 1))?;
            lexicon.insert(word.trim().to_lowercase(), tag.trim().to_string());
        }
        debug!(path = %path.display(), entries = lexicon.len(), "loaded tagger lexicon");
        Ok(LexiconTagger { lexicon })
    }

    fn tag_word(&self, word: &str, sentence_initial: bool) -> String {
        if is_punctuation(word) {
            return PUNCTUATION_TAG.to_string();
        }
        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.clone();
        }
        if word.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
            return "NUM".to_string();
        }
        if !sentence_initial && word.chars().next().is_some_and(char::is_uppercase) {
            return "NPROP".to_string();
        }
        let tag = if lower.ends_with("mente") {
            "ADV"
        } else if lower.ends_with("ado") || lower.ends_with("ido") {
            "PCP"
        } else if ["ar", "er", "ir", "ou", "ava", "iam", "aram", "eram"]
            .iter()
            .any(|s| lower.ends_with(s))
        {
            "V"
        } else if ["oso", "osa", "vel", "ico", "ica", "ivo", "iva"]
            .iter()
            .any(|s| lower.ends_with(s))
        {
            "ADJ"
        } else {
            "N"
        };
        tag.to_string()
    }
}

impl Tagger for LexiconTagger {
    fn tag_sents(&self, sentences: &[Vec<String>]) -> Result<Vec<Vec<TaggedWord>>> {
        Ok(sentences
            .iter()
            .map(|sentence| {
                sentence
                    .iter()
                    .enumerate()
                    .map(|(i, word)| TaggedWord::new(word.clone(), self.tag_word(word, i == 0)))
                    .collect()
            })
            .collect())
    }
}

/// DELAF-style lemma table keyed by `(form, tag)`, with a form-only fallback.
#[derive(Debug, Clone, Default)]
pub struct LexiconLemmatizer {
    by_form_and_tag: HashMap<(String, String), String>,
    by_form: HashMap<String, String>,
}

impl LexiconLemmatizer {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, String, String)>) -> Self {
        let mut lemmatizer = LexiconLemmatizer::default();
        for (form, tag, lemma) in entries {
            let form = form.to_lowercase();
            lemmatizer
                .by_form
                .entry(form.clone())
                .or_insert_with(|| lemma.clone());
            lemmatizer.by_form_and_tag.insert((form, tag), lemma);
        }
        lemmatizer
    }

    /// `form<TAB>tag<TAB>lemma` per line.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not open lemma lexicon: {}", path.display()))?;
        let mut entries = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let &[form, tag, lemma] = fields.as_slice() else {
                anyhow::bail!("{}:{}: expected form<TAB>tag<TAB>lemma", path.display(), lineno + 1);
            };
            entries.push((form.to_string(), tag.to_string(), lemma.to_string()));
        }
        debug!(path = %path.display(), entries = entries.len(), "loaded lemma lexicon");
        Ok(Self::from_entries(entries))
    }
}

impl Lemmatizer for LexiconLemmatizer {
    fn get_lemma(&self, word: &str, tag: &str) -> Option<String> {
        let form = word.to_lowercase();
        self.by_form_and_tag
            .get(&(form.clone(), tag.to_string()))
            .or_else(|| self.by_form.get(&form))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_lexicon_wins_over_heuristics() {
        let tagger = LexiconTagger::new(HashMap::from([
            ("o".to_string(), "ART".to_string()),
            ("mar".to_string(), "N".to_string()),
        ]));
        let tagged = tagger
            .tag_sents(&[sentence(&["O", "mar", "brilhava", "lindamente", "."])])
            .unwrap();
        let tags: Vec<&str> = tagged[0].iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["ART", "N", "V", "ADV", "PU"]);
    }

    #[test]
    fn test_closed_class_words_are_function_words() {
        let tagger = LexiconTagger::closed_class();
        let tagged = tagger
            .tag_sents(&[sentence(&["O", "gato", "e", "a", "gata", "de", "Maria", "."])])
            .unwrap();
        let tags: Vec<&str> = tagged[0].iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["ART", "N", "KC", "ART", "N", "PREP", "NPROP", "PU"]);
        for word in ["o", "e", "de"] {
            let tag = &tagger.tag_sents(&[sentence(&[word])]).unwrap()[0][0].tag;
            assert!(!is_content_tag(tag), "{word} tagged {tag}");
        }
    }

    #[test]
    fn test_proper_nouns_only_after_first_position() {
        let tagger = LexiconTagger::default();
        let tagged = tagger
            .tag_sents(&[sentence(&["Maria", "visitou", "Lisboa"])])
            .unwrap();
        assert_eq!(tagged[0][0].tag, "N");
        assert_eq!(tagged[0][2].tag, "NPROP");
    }

    #[test]
    fn test_lemmatizer_prefers_tagged_entry() {
        let lemmatizer = LexiconLemmatizer::from_entries([
            ("casas".into(), "N".into(), "casa".into()),
            ("casas".into(), "V".into(), "casar".into()),
        ]);
        assert_eq!(lemmatizer.get_lemma("Casas", "V").as_deref(), Some("casar"));
        assert_eq!(lemmatizer.get_lemma("casas", "ADJ").as_deref(), Some("casa"));
        assert_eq!(lemmatizer.get_lemma("gato", "N"), None);
    }

    #[test]
    fn test_dependency_arc_lengths() {
        let tree = DependencyTree {
            tokens: vec![
                DependencyToken { form: "O".into(), head: 2, relation: "det".into() },
                DependencyToken { form: "gato".into(), head: 3, relation: "nsubj".into() },
                DependencyToken { form: "dorme".into(), head: 0, relation: "root".into() },
            ],
        };
        assert_eq!(tree.arc_lengths(), (2, 2));
    }
}
