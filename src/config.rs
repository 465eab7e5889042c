//! Paths to the linguistic resources and cache settings.
//!
//! Read from a JSON file; every field is optional. Relative paths are
//! resolved against the directory holding the file.
//!
//! ```json
//! {
//!   "cache_limit": 200,
//!   "mattr_window": 100,
//!   "tagger_lexicon": "data/macmorpho.tsv",
//!   "frequency_corpus": "data/brwac_frequencies.json"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PoolError, Result};
use crate::mattr::DEFAULT_MATTR_WINDOW;
use crate::pool::DEFAULT_CACHE_LIMIT;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Most unpinned (per-text) resources the pool keeps at once.
    pub cache_limit: usize,
    pub mattr_window: usize,
    /// Content words rarer than this (in corpus counts) are "rare".
    pub rare_word_threshold: u64,

    /// `word<TAB>tag` lexicon for the default tagger.
    pub tagger_lexicon: Option<PathBuf>,
    /// `form<TAB>tag<TAB>lemma` lexicon for the default lemmatizer.
    pub lemma_lexicon: Option<PathBuf>,
    pub frequency_corpus: Option<PathBuf>,
    pub frequency_top_entries: Option<usize>,

    pub simple_words: Option<PathBuf>,
    pub discourse_markers: Option<PathBuf>,
    pub indefinite_pronouns: Option<PathBuf>,
    pub conjunctions: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache_limit: DEFAULT_CACHE_LIMIT,
            mattr_window: DEFAULT_MATTR_WINDOW,
            rare_word_threshold: 100,
            tagger_lexicon: None,
            lemma_lexicon: None,
            frequency_corpus: None,
            frequency_top_entries: None,
            simple_words: None,
            discourse_markers: None,
            indefinite_pronouns: None,
            conjunctions: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PoolError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| PoolError::InvalidConfig(format!("{}: {e}", path.display())))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mattr_window == 0 {
            return Err(PoolError::InvalidConfig(
                "mattr_window must be at least 1".to_string(),
            ));
        }
        if self.frequency_top_entries == Some(0) {
            return Err(PoolError::InvalidConfig(
                "frequency_top_entries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.tagger_lexicon,
            &mut self.lemma_lexicon,
            &mut self.frequency_corpus,
            &mut self.simple_words,
            &mut self.discourse_markers,
            &mut self.indefinite_pronouns,
            &mut self.conjunctions,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
