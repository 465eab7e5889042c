//! Word frequency corpora and plain word lists.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Word counts from a reference corpus.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCorpus {
    counts: HashMap<String, u64>,
    max_count: u64,
}

impl FrequencyCorpus {
    pub fn from_counts(items: impl IntoIterator<Item = (String, u64)>) -> Self {
        let mut counts = HashMap::new();
        for (word, count) in items {
            *counts.entry(word.to_lowercase()).or_insert(0) += count;
        }
        let max_count = counts.values().copied().max().unwrap_or(0);
        FrequencyCorpus { counts, max_count }
    }

    /// Load a corpus file. `.json` files hold `[["de", 1234], ...]`;
    /// anything else is read as TSV with `word<TAB>count` per line.
    /// With `top_k`, only the first K entries are kept.
    pub fn load(path: &Path, top_k: Option<usize>) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not open frequency corpus: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut items = if is_json {
            parse_json_pairs(&content)?
        } else {
            parse_tsv_pairs(&content)
                .with_context(|| format!("malformed frequency corpus: {}", path.display()))?
        };

        if let Some(k) = top_k {
            items.truncate(k.min(items.len()));
        }
        if items.is_empty() {
            bail!("frequency corpus is empty: {}", path.display());
        }

        debug!(path = %path.display(), entries = items.len(), "loaded frequency corpus");
        Ok(Self::from_counts(items))
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(&word.to_lowercase()).copied().unwrap_or(0)
    }

    /// Count scaled to `[0, 1]` by the most frequent entry; unknown words weigh 0.
    pub fn weight(&self, word: &str) -> f64 {
        if self.max_count == 0 {
            return 0.0;
        }
        self.count(word) as f64 / self.max_count as f64
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn parse_json_pairs(content: &str) -> Result<Vec<(String, u64)>> {
    let json: serde_json::Value =
        serde_json::from_str(content).context("frequency corpus is not valid JSON")?;
    let arr = json
        .as_array()
        .context("expected a top-level JSON array")?;

    let mut items = Vec::with_capacity(arr.len());
    for v in arr {
        let Some(pair) = v.as_array() else {
            bail!("corpus entry is not a [word, count] array");
        };
        if pair.len() < 2 {
            bail!("corpus entry has fewer than two elements");
        }
        let word = pair[0]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("first element is not a string"))?
            .to_string();
        let count = pair[1]
            .as_u64()
            .ok_or_else(|| anyhow::anyhow!("second element is not a non-negative integer"))?;
        items.push((word, count));
    }
    Ok(items)
}

fn parse_tsv_pairs(content: &str) -> Result<Vec<(String, u64)>> {
    let mut items = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let word = fields.next().unwrap_or_default().trim();
        let count = fields
            .next()
            .context(format!("line {}: missing count column", lineno + 1))?
            .trim()
            .parse::<u64>()
            .with_context(|| format!("line {}: count is not an integer", lineno + 1))?;
        items.push((word.to_string(), count));
    }
    Ok(items)
}

/// A set of lower-cased words or phrases. Phrases are stored with single spaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordList {
    entries: HashSet<String>,
}

impl WordList {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| normalize_entry(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        WordList { entries }
    }

    /// One entry per line; blank lines and `#` comments are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not open word list: {}", path.display()))?;
        let list = Self::from_entries(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        );
        debug!(path = %path.display(), entries = list.len(), "loaded word list");
        Ok(list)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains(&normalize_entry(word))
    }

    pub fn entries(&self) -> &HashSet<String> {
        &self.entries
    }

    /// Entries split into token sequences, longest first.
    pub fn phrases(&self) -> Vec<Vec<String>> {
        let mut phrases: Vec<Vec<String>> = self
            .entries
            .iter()
            .map(|e| e.split(' ').map(str::to_string).collect())
            .collect();
        phrases.sort_by(|a: &Vec<String>, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_entry(entry: &str) -> String {
    entry
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Built-in lists used when no file is configured.
pub mod defaults {
    pub const CONJUNCTIONS: &[&str] = &[
        "e", "nem", "mas", "porém", "contudo", "todavia", "entretanto", "ou", "ora", "logo",
        "portanto", "pois", "porque", "que", "se", "embora", "quando", "enquanto", "conforme",
        "como", "caso", "contanto que", "ainda que", "para que", "a fim de que", "à medida que",
    ];

    pub const INDEFINITE_PRONOUNS: &[&str] = &[
        "algum", "alguma", "alguns", "algumas", "nenhum", "nenhuma", "nenhuns", "nenhumas",
        "todo", "toda", "todos", "todas", "outro", "outra", "outros", "outras", "muito",
        "muita", "muitos", "muitas", "pouco", "pouca", "poucos", "poucas", "certo", "certa",
        "certos", "certas", "vário", "vária", "vários", "várias", "tanto", "tanta", "tantos",
        "tantas", "quanto", "quanta", "quantos", "quantas", "qualquer", "quaisquer", "alguém",
        "ninguém", "tudo", "nada", "algo", "cada", "outrem",
    ];

    pub const DISCOURSE_MARKERS: &[&str] = &[
        "além disso", "por exemplo", "ou seja", "isto é", "por outro lado", "no entanto",
        "em primeiro lugar", "em segundo lugar", "finalmente", "por fim", "assim", "então",
        "portanto", "consequentemente", "dessa forma", "desse modo", "em resumo", "enfim",
        "aliás", "inclusive", "ademais", "afinal", "de fato", "na verdade", "em seguida",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_json_pairs_like_wikipedia_dump() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(f, r#"[["de", 200], ["casa", 50], ["gato", 10]]"#).unwrap();

        let corpus = FrequencyCorpus::load(f.path(), None).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.count("Casa"), 50);
        assert_eq!(corpus.weight("de"), 1.0);
        assert_eq!(corpus.weight("casa"), 0.25);
        assert_eq!(corpus.weight("inexistente"), 0.0);
    }

    #[test]
    fn test_load_tsv_with_top_k() {
        let mut f = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(f, "# palavra\tcontagem").unwrap();
        writeln!(f, "de\t200").unwrap();
        writeln!(f, "casa\t50").unwrap();
        writeln!(f, "gato\t10").unwrap();

        let corpus = FrequencyCorpus::load(f.path(), Some(2)).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.count("gato"), 0);
    }

    #[test]
    fn test_malformed_tsv_is_an_error() {
        let mut f = tempfile::Builder::new().suffix(".tsv").tempfile().unwrap();
        writeln!(f, "de\tmuitos").unwrap();
        assert!(FrequencyCorpus::load(f.path(), None).is_err());
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let mut f = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(f, "[]").unwrap();
        assert!(FrequencyCorpus::load(f.path(), None).is_err());
    }

    #[test]
    fn test_word_list_normalizes_phrases() {
        let list = WordList::from_entries(["Além   disso", "Logo", ""]);
        assert_eq!(list.len(), 2);
        assert!(list.contains("além disso"));
        assert!(list.contains("LOGO"));
        assert_eq!(list.phrases()[0], vec!["além", "disso"]);
    }

    #[test]
    fn test_word_list_load_skips_comments() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "# simples").unwrap();
        writeln!(f, "casa").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "bola").unwrap();

        let list = WordList::load(f.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("bola"));
    }
}
