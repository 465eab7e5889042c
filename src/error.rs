use thiserror::Error;

/// Errors raised by the resource pool, its hooks and the statistics built on it.
#[derive(Error, Debug)]
pub enum PoolError {
    /// No hook is registered under this name.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// The cached value is not of the type the caller asked for.
    #[error("resource `{name}` is not of type {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    /// The resource was requested again while its own hook was running.
    #[error("cyclic dependency while computing resource `{0}`")]
    Cycle(String),

    /// A collaborator (parser, tagger, ...) has not been registered.
    #[error("{0} is not available; register a hook for it first")]
    Unavailable(&'static str),

    /// The hook ran and failed.
    #[error("failed to compute resource `{name}`: {source}")]
    Hook {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A statistic was asked for over nothing (no tokens, zero window).
    #[error("empty input")]
    EmptyInput,

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}

impl PoolError {
    pub(crate) fn from_hook(name: &str, err: anyhow::Error) -> Self {
        match err.downcast::<PoolError>() {
            Ok(inner) => inner,
            Err(source) => PoolError::Hook {
                name: name.to_string(),
                source,
            },
        }
    }

    pub fn is_empty_input(&self) -> bool {
        matches!(self, PoolError::EmptyInput)
    }
}

pub type Result<T, E = PoolError> = std::result::Result<T, E>;
