use std::path::PathBuf;

/// Boxed error type returned by [`CssTransformService`](crate::CssTransformService).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by configuration and by the middleware itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root directory is empty, relative, or not valid UTF-8.
    #[error("root directory must be a non-empty absolute UTF-8 path, got {0:?}")]
    InvalidRoot(PathBuf),

    /// The response body failed while it was being drained.
    #[error("failed to read response body")]
    Body(#[source] BoxError),

    /// The transform engine rejected the stylesheet.
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Errors raised by a [`CssEngine`](crate::CssEngine).
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The source bytes are not valid UTF-8.
    #[error("{filename}: stylesheet is not valid UTF-8")]
    Encoding {
        /// Source file the bytes were served for.
        filename: String,
        /// Underlying decode error.
        #[source]
        source: std::str::Utf8Error,
    },

    /// The stylesheet could not be parsed.
    #[error("{filename}: failed to parse stylesheet: {message}")]
    Parse {
        /// Source file the stylesheet was served for.
        filename: String,
        /// Engine diagnostic.
        message: String,
    },

    /// Minification failed.
    #[error("{filename}: failed to minify stylesheet: {message}")]
    Minify {
        /// Source file the stylesheet was served for.
        filename: String,
        /// Engine diagnostic.
        message: String,
    },

    /// Printing the stylesheet failed.
    #[error("{filename}: failed to print stylesheet: {message}")]
    Print {
        /// Source file the stylesheet was served for.
        filename: String,
        /// Engine diagnostic.
        message: String,
    },

    /// The CSS modules naming pattern is invalid.
    #[error("invalid css modules pattern {pattern:?}: {message}")]
    Pattern {
        /// The configured pattern.
        pattern: String,
        /// Engine diagnostic.
        message: String,
    },

    /// The browserslist targets could not be resolved.
    #[error("invalid browser targets {queries:?}: {message}")]
    Targets {
        /// The configured queries.
        queries: Vec<String>,
        /// Resolver diagnostic.
        message: String,
    },
}
