//! Syntactic measures. These need a dependency parser and a PALAVRAS flat
//! parser registered in the pool; without them they fail with
//! [`PoolError::Unavailable`](crate::error::PoolError::Unavailable).

use std::sync::OnceLock;

use regex::Regex;

use super::{ratio, Metric, MetricCategory};
use crate::error::Result;
use crate::pool::ResourcePool;
use crate::text::Text;

pub fn category() -> MetricCategory {
    MetricCategory::new(
        "syntax",
        vec![
            Box::new(MeanDependencyDistance),
            Box::new(SubordinateClausesPerSentence),
        ],
    )
}

/// Mean distance, in tokens, between each word and its head.
pub struct MeanDependencyDistance;

impl Metric for MeanDependencyDistance {
    fn name(&self) -> &str {
        "Mean dependency distance"
    }

    fn column_name(&self) -> &str {
        "dependency_distance"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let trees = pool.dependency_trees(text)?;
        let (sum, arcs) = trees
            .iter()
            .map(|t| t.arc_lengths())
            .fold((0, 0), |(s, a), (ts, ta)| (s + ts, a + ta));
        Ok(ratio(sum as f64, arcs as f64))
    }
}

fn subordinate_clause_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Finite, infinitive and averbal subclause markers on the clause head.
    RE.get_or_init(|| Regex::new(r"@#(?:FS|ICL|AS)-").unwrap())
}

/// Subordinate clauses found in the PALAVRAS output, per sentence.
pub struct SubordinateClausesPerSentence;

impl Metric for SubordinateClausesPerSentence {
    fn name(&self) -> &str {
        "Subordinate clauses per sentence"
    }

    fn column_name(&self) -> &str {
        "subordinate_clauses_per_sentence"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let flat = pool.palavras_flat(text)?;
        let clauses = flat
            .lines()
            .filter(|line| subordinate_clause_regex().is_match(line))
            .count();
        let sentences = pool.sentences(text)?.len();
        Ok(ratio(clauses as f64, sentences as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PoolError;
    use crate::metrics::fixtures::{assert_close, pool};
    use crate::nlp::{DependencyParser, DependencyToken, DependencyTree, FlatParser};
    use crate::pool::resources::{register_dependency_parser, register_flat_parser};

    /// Every token depends on the last token of its sentence.
    struct LastIsHead;

    impl DependencyParser for LastIsHead {
        fn parse_sents(&self, sentences: &[Vec<String>]) -> anyhow::Result<Vec<DependencyTree>> {
            Ok(sentences
                .iter()
                .map(|s| DependencyTree {
                    tokens: s
                        .iter()
                        .enumerate()
                        .map(|(i, w)| DependencyToken {
                            form: w.clone(),
                            head: if i + 1 == s.len() { 0 } else { s.len() },
                            relation: "dep".into(),
                        })
                        .collect(),
                })
                .collect())
        }
    }

    struct Canned(&'static str);

    impl FlatParser for Canned {
        fn parse(&self, _raw_text: &str) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_dependency_distance() {
        let mut pool = pool();
        register_dependency_parser(&mut pool, LastIsHead);
        // Tokens: O gato dorme . -> distances 3, 2, 1
        let text = Text::new("O gato dorme.");
        assert_close(MeanDependencyDistance.value_for_text(&text, &pool).unwrap(), 2.0);
    }

    #[test]
    fn test_subordinate_clauses() {
        let mut pool = pool();
        register_flat_parser(
            &mut pool,
            Canned(
                "Ele [ele] PERS M 3S NOM @SUBJ>\n\
                 disse [dizer] V PS 3S IND VFIN @FS-STA\n\
                 que [que] KS @SUB @#FS-<ACC\n\
                 viria [vir] V COND 3S VFIN @FMV\n\
                 . [.] PU @PU",
            ),
        );
        let text = Text::new("Ele disse que viria. Ninguém veio.");
        assert_close(
            SubordinateClausesPerSentence.value_for_text(&text, &pool).unwrap(),
            0.5,
        );
    }

    #[test]
    fn test_without_parsers() {
        let pool = pool();
        let text = Text::new("O gato dorme.");
        assert!(matches!(
            MeanDependencyDistance.value_for_text(&text, &pool),
            Err(PoolError::Unavailable(_))
        ));
        assert!(matches!(
            SubordinateClausesPerSentence.value_for_text(&text, &pool),
            Err(PoolError::Unavailable(_))
        ));
    }
}
