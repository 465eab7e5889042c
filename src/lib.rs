//! # cohmetrix
//!
//! Linguistic complexity metrics for Portuguese text, built around a
//! memoizing resource pool.
//!
//! - **Resource pool**: named hooks produce resources (tagged sentences,
//!   word lists, frequency corpora, parses) on demand; results are cached
//!   per `(name, argument)` in a pinned tier and a bounded FIFO tier.
//! - **MATTR**: moving-average type-token ratio and its relative variant.
//! - **Metrics**: stateless measurements grouped into categories, each
//!   reading its inputs through the pool.
//!
//! ## Example
//!
//! ```rust
//! use cohmetrix::{Config, MetricSet, ResourcePool, Text};
//!
//! let pool = ResourcePool::from_config(&Config::default());
//! let text = Text::new("O menino correu. A bola rolou.");
//! let values = MetricSet::default_set().values_for_text(&text, &pool).unwrap();
//! assert!(values.iter().any(|v| v.column == "words" && v.value == 6.0));
//! ```

pub mod config;
pub mod error;
pub mod lexicon;
pub mod mattr;
pub mod metrics;
pub mod nlp;
pub mod pool;
pub mod text;
pub mod tokenize;

pub use config::Config;
pub use error::{PoolError, Result};
pub use mattr::{mattr, mattr_relative, DEFAULT_MATTR_WINDOW};
pub use metrics::{Metric, MetricCategory, MetricSet, MetricValue};
pub use pool::{Arg, CacheStats, ResourcePool, DEFAULT_CACHE_LIMIT};
pub use text::{Text, TextKey};
