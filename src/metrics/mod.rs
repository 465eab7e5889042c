//! Text metrics computed over resources fetched from a [`ResourcePool`].
//!
//! Every metric is stateless: it reads what it needs through the pool and
//! returns one number. Ratios over an empty denominator are 0, not an
//! error, so a text with no words (or no clauses, ...) scores 0.

pub mod basic_counts;
pub mod connectives;
pub mod lexical_diversity;
pub mod readability;
pub mod syntax;
pub mod word_information;

use serde::Serialize;
use tracing::debug;

use crate::error::{PoolError, Result};
use crate::pool::ResourcePool;
use crate::text::Text;

/// A single text measurement.
pub trait Metric {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Key used in reports.
    fn column_name(&self) -> &str;

    fn value_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<f64>;
}

/// A named group of related metrics.
pub struct MetricCategory {
    pub name: &'static str,
    pub metrics: Vec<Box<dyn Metric>>,
}

impl MetricCategory {
    pub fn new(name: &'static str, metrics: Vec<Box<dyn Metric>>) -> Self {
        MetricCategory { name, metrics }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub category: &'static str,
    pub column: String,
    pub value: f64,
}

/// An ordered collection of metric categories.
pub struct MetricSet {
    categories: Vec<MetricCategory>,
}

impl MetricSet {
    pub fn new(categories: Vec<MetricCategory>) -> Self {
        MetricSet { categories }
    }

    /// Every category that needs only the built-in resources.
    pub fn default_set() -> Self {
        MetricSet::new(vec![
            basic_counts::category(),
            readability::category(),
            lexical_diversity::category(),
            word_information::category(),
            connectives::category(),
        ])
    }

    /// Add the syntax category, which needs a dependency parser and a
    /// PALAVRAS flat parser registered in the pool.
    pub fn with_syntax(mut self) -> Self {
        self.categories.push(syntax::category());
        self
    }

    /// The default set when `names` is empty; otherwise exactly the named
    /// categories, syntax included, in the order given.
    pub fn for_categories(names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(MetricSet::default_set());
        }
        MetricSet::default_set().with_syntax().only(names)
    }

    /// Keep only the named categories, in the order given.
    pub fn only(mut self, names: &[String]) -> Result<Self> {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let pos = self
                .categories
                .iter()
                .position(|c| c.name == name.as_str())
                .ok_or_else(|| PoolError::InvalidConfig(format!("unknown metric category: {name}")))?;
            selected.push(self.categories.remove(pos));
        }
        self.categories = selected;
        Ok(self)
    }

    pub fn categories(&self) -> &[MetricCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.metrics.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute every metric for `text`. The first failing metric aborts.
    pub fn values_for_text(&self, text: &Text, pool: &ResourcePool) -> Result<Vec<MetricValue>> {
        let mut values = Vec::with_capacity(self.len());
        for category in &self.categories {
            for metric in &category.metrics {
                let value = metric.value_for_text(text, pool)?;
                debug!(metric = metric.column_name(), value, "computed metric");
                values.push(MetricValue {
                    category: category.name,
                    column: metric.column_name().to_string(),
                    value,
                });
            }
        }
        Ok(values)
    }
}

/// `num / den`, or 0 when there is nothing to divide by.
pub(crate) fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Occurrences per thousand words.
pub(crate) fn incidence(count: usize, words: usize) -> f64 {
    ratio(count as f64 * 1000.0, words as f64)
}

/// Map the empty-input failure of a windowed statistic to 0.
pub(crate) fn zero_if_empty(value: Result<f64>) -> Result<f64> {
    match value {
        Err(PoolError::EmptyInput) => Ok(0.0),
        other => other,
    }
}
