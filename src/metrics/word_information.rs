//! Corpus frequency of the text's content words.

use super::{ratio, Metric, MetricCategory};
use crate::error::Result;
use crate::pool::ResourcePool;
use crate::text::Text;

pub fn category() -> MetricCategory {
    MetricCategory::new(
        "word_information",
        vec![
            Box::new(ContentWordFrequency),
            Box::new(ContentWordLogFrequency),
            Box::new(RareContentWordRatio),
        ],
    )
}

pub struct ContentWordFrequency;

impl Metric for ContentWordFrequency {
    fn name(&self) -> &str {
        "Mean content word frequency"
    }

    fn column_name(&self) -> &str {
        "cw_freq"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let freqs = pool.content_word_frequencies(text)?;
        let sum: u64 = freqs.iter().sum();
        Ok(ratio(sum as f64, freqs.len() as f64))
    }
}

/// Mean of `log10(count + 1)`, so words missing from the corpus count as 0.
pub struct ContentWordLogFrequency;

impl Metric for ContentWordLogFrequency {
    fn name(&self) -> &str {
        "Mean log10 content word frequency"
    }

    fn column_name(&self) -> &str {
        "cw_freq_log"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let freqs = pool.content_word_frequencies(text)?;
        let sum: f64 = freqs.iter().map(|&c| (c as f64 + 1.0).log10()).sum();
        Ok(ratio(sum, freqs.len() as f64))
    }
}

/// Share of content words whose corpus count is under the configured threshold.
pub struct RareContentWordRatio;

impl Metric for RareContentWordRatio {
    fn name(&self) -> &str {
        "Ratio of rare content words"
    }

    fn column_name(&self) -> &str {
        "cw_rare_ratio"
    }

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64> {
        let threshold = pool.config()?.rare_word_threshold;
        let freqs = pool.content_word_frequencies(text)?;
        let rare = freqs.iter().filter(|&&c| c < threshold).count();
        Ok(ratio(rare as f64, freqs.len() as f64))
    }
}
