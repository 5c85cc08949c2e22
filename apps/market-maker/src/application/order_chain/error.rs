//! Order chain configuration errors.

/// Errors raised while building an order chain from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainConfigError {
    /// No element is registered under this name.
    #[error("unknown order chain element '{name}'")]
    UnknownElement {
        /// The configured name.
        name: String,
    },

    /// A required option was not given.
    #[error("order chain element '{element}' requires option '{option}'")]
    MissingOption {
        /// Element name.
        element: String,
        /// Option name.
        option: String,
    },

    /// An option was given with an unusable value.
    #[error("order chain element '{element}' option '{option}' is invalid: {message}")]
    InvalidOption {
        /// Element name.
        element: String,
        /// Option name.
        option: String,
        /// What is wrong with it.
        message: String,
    },
}
