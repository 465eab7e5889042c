//! Default resources: the pinned linguistic tools and word lists, and the
//! per-text representations derived from them.

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use tracing::warn;

use super::{Arg, ResourcePool};
use crate::config::Config;
use crate::error::{PoolError, Result};
use crate::lexicon::{defaults, FrequencyCorpus, WordList};
use crate::nlp::{
    DependencyParser, DependencyTree, FlatParser, Lemmatizer, LexiconLemmatizer, LexiconTagger,
    TaggedWord, Tagger,
};
use crate::text::Text;
use crate::tokenize::{split_sentences, syllables, tokenize};

// Pinned.
pub const CONFIG: &str = "config";
pub const TAGGER: &str = "tagger";
pub const LEMMATIZER: &str = "lemmatizer";
pub const DEPENDENCY_PARSER: &str = "dependency_parser";
pub const FLAT_PARSER: &str = "flat_parser";
pub const FREQUENCY_CORPUS: &str = "frequency_corpus";
pub const SIMPLE_WORDS: &str = "simple_words";
pub const DISCOURSE_MARKERS: &str = "discourse_markers";
pub const INDEFINITE_PRONOUNS: &str = "indefinite_pronouns";
pub const CONJUNCTIONS: &str = "conjunctions";

// Per text.
pub const PARAGRAPHS: &str = "paragraphs";
pub const SENTENCES: &str = "sentences";
pub const TOKENIZED_SENTENCES: &str = "tokenized_sentences";
pub const TAGGED_SENTENCES: &str = "tagged_sentences";
pub const TAGGED_WORDS: &str = "tagged_words";
pub const WORDS: &str = "words";
pub const ALL_WORDS: &str = "all_words";
pub const WORD_TYPES: &str = "word_types";
pub const CONTENT_WORDS: &str = "content_words";
pub const FUNCTION_WORDS: &str = "function_words";
pub const CONTENT_WORD_LEMMAS: &str = "content_word_lemmas";
pub const SYLLABLES_PER_WORD: &str = "syllables_per_word";
pub const CONTENT_WORD_FREQUENCIES: &str = "content_word_frequencies";
pub const DEPENDENCY_TREES: &str = "dependency_trees";
pub const PALAVRAS_FLAT: &str = "palavras_flat";

pub(crate) fn register_defaults(pool: &mut ResourcePool, config: &Config) {
    let cfg = config.clone();
    pool.register(CONFIG, true, move |_, _| Ok(cfg.clone()));

    let path = config.tagger_lexicon.clone();
    pool.register(TAGGER, true, move |_, _| {
        let tagger = match &path {
            Some(p) => LexiconTagger::load(p)?,
            None => {
                warn!("no tagger lexicon configured, tagging with closed-class words and suffix heuristics");
                LexiconTagger::closed_class()
            }
        };
        Ok(Rc::new(tagger) as Rc<dyn Tagger>)
    });

    let path = config.lemma_lexicon.clone();
    pool.register(LEMMATIZER, true, move |_, _| {
        let lemmatizer = match &path {
            Some(p) => LexiconLemmatizer::load(p)?,
            None => LexiconLemmatizer::default(),
        };
        Ok(Rc::new(lemmatizer) as Rc<dyn Lemmatizer>)
    });

    pool.register(DEPENDENCY_PARSER, true, |_, _| -> anyhow::Result<Rc<dyn DependencyParser>> {
        Err(PoolError::Unavailable("dependency parser").into())
    });
    pool.register(FLAT_PARSER, true, |_, _| -> anyhow::Result<Rc<dyn FlatParser>> {
        Err(PoolError::Unavailable("PALAVRAS flat parser").into())
    });

    let path = config.frequency_corpus.clone();
    let top_k = config.frequency_top_entries;
    pool.register(FREQUENCY_CORPUS, true, move |_, _| match &path {
        Some(p) => FrequencyCorpus::load(p, top_k),
        None => {
            warn!("no frequency corpus configured, every word has frequency 0");
            Ok(FrequencyCorpus::default())
        }
    });

    register_word_list(pool, SIMPLE_WORDS, config.simple_words.as_deref(), &[]);
    register_word_list(
        pool,
        DISCOURSE_MARKERS,
        config.discourse_markers.as_deref(),
        defaults::DISCOURSE_MARKERS,
    );
    register_word_list(
        pool,
        INDEFINITE_PRONOUNS,
        config.indefinite_pronouns.as_deref(),
        defaults::INDEFINITE_PRONOUNS,
    );
    register_word_list(
        pool,
        CONJUNCTIONS,
        config.conjunctions.as_deref(),
        defaults::CONJUNCTIONS,
    );

    register_text_resources(pool);
}

fn register_word_list(
    pool: &mut ResourcePool,
    name: &'static str,
    path: Option<&Path>,
    fallback: &'static [&'static str],
) {
    let path = path.map(Path::to_path_buf);
    pool.register(name, true, move |_, _| match &path {
        Some(p) => WordList::load(p),
        None => {
            if fallback.is_empty() {
                warn!(list = name, "no word list configured, using an empty list");
            }
            Ok(WordList::from_entries(fallback.iter().copied()))
        }
    });
}

fn register_text_resources(pool: &mut ResourcePool) {
    pool.register(PARAGRAPHS, false, |_, arg| {
        let text = arg.text()?;
        let skip = text.subtitles().unwrap_or(0);
        Ok(text.paragraphs().iter().skip(skip).cloned().collect::<Vec<_>>())
    });

    pool.register(SENTENCES, false, |pool, arg| {
        let paragraphs = pool.paragraphs(arg.text()?)?;
        Ok(paragraphs
            .iter()
            .flat_map(|p| split_sentences(p))
            .collect::<Vec<_>>())
    });

    pool.register(TOKENIZED_SENTENCES, false, |pool, arg| {
        let sentences = pool.sentences(arg.text()?)?;
        Ok(sentences.iter().map(|s| tokenize(s)).collect::<Vec<_>>())
    });

    pool.register(TAGGED_SENTENCES, false, |pool, arg| {
        let tokenized = pool.tokenized_sentences(arg.text()?)?;
        pool.tagger()?
            .tag_sents(&tokenized)
            .context("tagger failed")
    });

    pool.register(TAGGED_WORDS, false, |pool, arg| {
        let tagged = pool.tagged_sentences(arg.text()?)?;
        Ok(tagged
            .iter()
            .flatten()
            .filter(|t| !t.is_punctuation())
            .cloned()
            .collect::<Vec<_>>())
    });

    pool.register(WORDS, false, |pool, arg| {
        let tagged = pool.tagged_words(arg.text()?)?;
        Ok(tagged.iter().map(|t| t.word.clone()).collect::<Vec<_>>())
    });

    pool.register(ALL_WORDS, false, |pool, arg| {
        let words = pool.words(arg.text()?)?;
        Ok(words.iter().map(|w| w.to_lowercase()).collect::<Vec<_>>())
    });

    pool.register(WORD_TYPES, false, |pool, arg| {
        let words = pool.all_words(arg.text()?)?;
        Ok(words.iter().cloned().collect::<HashSet<_>>())
    });

    pool.register(CONTENT_WORDS, false, |pool, arg| {
        let tagged = pool.tagged_words(arg.text()?)?;
        Ok(lowercase_where(&tagged, TaggedWord::is_content_word))
    });

    pool.register(FUNCTION_WORDS, false, |pool, arg| {
        let tagged = pool.tagged_words(arg.text()?)?;
        Ok(lowercase_where(&tagged, |t| !t.is_content_word()))
    });

    pool.register(CONTENT_WORD_LEMMAS, false, |pool, arg| {
        let tagged = pool.tagged_words(arg.text()?)?;
        let lemmatizer = pool.lemmatizer()?;
        Ok(tagged
            .iter()
            .filter(|t| t.is_content_word())
            .map(|t| {
                lemmatizer
                    .get_lemma(&t.word, &t.tag)
                    .unwrap_or_else(|| t.word.to_lowercase())
            })
            .collect::<Vec<_>>())
    });

    pool.register(SYLLABLES_PER_WORD, false, |pool, arg| {
        let words = pool.all_words(arg.text()?)?;
        Ok(words.iter().map(|w| syllables(w)).collect::<Vec<_>>())
    });

    pool.register(CONTENT_WORD_FREQUENCIES, false, |pool, arg| {
        let content = pool.content_words(arg.text()?)?;
        let corpus = pool.frequency_corpus()?;
        Ok(content.iter().map(|w| corpus.count(w)).collect::<Vec<_>>())
    });

    pool.register(DEPENDENCY_TREES, false, |pool, arg| {
        let tokenized = pool.tokenized_sentences(arg.text()?)?;
        pool.dependency_parser()?
            .parse_sents(&tokenized)
            .context("dependency parser failed")
    });

    pool.register(PALAVRAS_FLAT, false, |pool, arg| {
        let text = arg.text()?;
        pool.flat_parser()?
            .parse(text.raw_content())
            .context("PALAVRAS parser failed")
    });
}

fn lowercase_where(tagged: &[TaggedWord], keep: impl Fn(&TaggedWord) -> bool) -> Vec<String> {
    tagged
        .iter()
        .filter(|&t| keep(t))
        .map(|t| t.word.to_lowercase())
        .collect()
}

/// Replace the dependency parser collaborator.
pub fn register_dependency_parser(pool: &mut ResourcePool, parser: impl DependencyParser + 'static) {
    let parser: Rc<dyn DependencyParser> = Rc::new(parser);
    pool.register(DEPENDENCY_PARSER, true, move |_, _| Ok(Rc::clone(&parser)));
}

/// Replace the PALAVRAS flat parser collaborator.
pub fn register_flat_parser(pool: &mut ResourcePool, parser: impl FlatParser + 'static) {
    let parser: Rc<dyn FlatParser> = Rc::new(parser);
    pool.register(FLAT_PARSER, true, move |_, _| Ok(Rc::clone(&parser)));
}

/// Replace the tagger collaborator.
pub fn register_tagger(pool: &mut ResourcePool, tagger: impl Tagger + 'static) {
    let tagger: Rc<dyn Tagger> = Rc::new(tagger);
    pool.register(TAGGER, true, move |_, _| Ok(Rc::clone(&tagger)));
}

/// Typed accessors for the default resources.
impl ResourcePool {
    pub fn config(&self) -> Result<Rc<Config>> {
        self.get(CONFIG, Arg::Unit)
    }

    pub fn tagger(&self) -> Result<Rc<dyn Tagger>> {
        Ok(Rc::clone(&*self.get::<Rc<dyn Tagger>>(TAGGER, Arg::Unit)?))
    }

    pub fn lemmatizer(&self) -> Result<Rc<dyn Lemmatizer>> {
        Ok(Rc::clone(&*self.get::<Rc<dyn Lemmatizer>>(LEMMATIZER, Arg::Unit)?))
    }

    pub fn dependency_parser(&self) -> Result<Rc<dyn DependencyParser>> {
        Ok(Rc::clone(
            &*self.get::<Rc<dyn DependencyParser>>(DEPENDENCY_PARSER, Arg::Unit)?,
        ))
    }

    pub fn flat_parser(&self) -> Result<Rc<dyn FlatParser>> {
        Ok(Rc::clone(&*self.get::<Rc<dyn FlatParser>>(FLAT_PARSER, Arg::Unit)?))
    }

    pub fn frequency_corpus(&self) -> Result<Rc<FrequencyCorpus>> {
        self.get(FREQUENCY_CORPUS, Arg::Unit)
    }

    pub fn simple_words(&self) -> Result<Rc<WordList>> {
        self.get(SIMPLE_WORDS, Arg::Unit)
    }

    pub fn discourse_markers(&self) -> Result<Rc<WordList>> {
        self.get(DISCOURSE_MARKERS, Arg::Unit)
    }

    pub fn indefinite_pronouns(&self) -> Result<Rc<WordList>> {
        self.get(INDEFINITE_PRONOUNS, Arg::Unit)
    }

    pub fn conjunctions(&self) -> Result<Rc<WordList>> {
        self.get(CONJUNCTIONS, Arg::Unit)
    }

    pub fn paragraphs(&self, text: &Text) -> Result<Rc<Vec<String>>> {
        self.get(PARAGRAPHS, Arg::Text(text))
    }

    pub fn sentences(&self, text: &Text) -> Result<Rc<Vec<String>>> {
        self.get(SENTENCES, Arg::Text(text))
    }

    pub fn tokenized_sentences(&self, text: &Text) -> Result<Rc<Vec<Vec<String>>>> {
        self.get(TOKENIZED_SENTENCES, Arg::Text(text))
    }

    pub fn tagged_sentences(&self, text: &Text) -> Result<Rc<Vec<Vec<TaggedWord>>>> {
        self.get(TAGGED_SENTENCES, Arg::Text(text))
    }

    /// Tagged tokens of the whole text, punctuation removed.
    pub fn tagged_words(&self, text: &Text) -> Result<Rc<Vec<TaggedWord>>> {
        self.get(TAGGED_WORDS, Arg::Text(text))
    }

    pub fn words(&self, text: &Text) -> Result<Rc<Vec<String>>> {
        self.get(WORDS, Arg::Text(text))
    }

    /// Words, lower-cased.
    pub fn all_words(&self, text: &Text) -> Result<Rc<Vec<String>>> {
        self.get(ALL_WORDS, Arg::Text(text))
    }

    pub fn word_types(&self, text: &Text) -> Result<Rc<HashSet<String>>> {
        self.get(WORD_TYPES, Arg::Text(text))
    }

    pub fn content_words(&self, text: &Text) -> Result<Rc<Vec<String>>> {
        self.get(CONTENT_WORDS, Arg::Text(text))
    }

    pub fn function_words(&self, text: &Text) -> Result<Rc<Vec<String>>> {
        self.get(FUNCTION_WORDS, Arg::Text(text))
    }

    pub fn content_word_lemmas(&self, text: &Text) -> Result<Rc<Vec<String>>> {
        self.get(CONTENT_WORD_LEMMAS, Arg::Text(text))
    }

    pub fn syllables_per_word(&self, text: &Text) -> Result<Rc<Vec<usize>>> {
        self.get(SYLLABLES_PER_WORD, Arg::Text(text))
    }

    pub fn content_word_frequencies(&self, text: &Text) -> Result<Rc<Vec<u64>>> {
        self.get(CONTENT_WORD_FREQUENCIES, Arg::Text(text))
    }

    pub fn dependency_trees(&self, text: &Text) -> Result<Rc<Vec<DependencyTree>>> {
        self.get(DEPENDENCY_TREES, Arg::Text(text))
    }

    pub fn palavras_flat(&self, text: &Text) -> Result<Rc<String>> {
        self.get(PALAVRAS_FLAT, Arg::Text(text))
    }
}
