use crate::error::TransformError;
use crate::options::TransformOptions;
use bytes::Bytes;
use lightningcss::css_modules::{Config, Pattern};
use lightningcss::stylesheet::{
    MinifyOptions, ParserFlags, ParserOptions, PrinterOptions, StyleSheet,
};
use lightningcss::targets::Targets;

/// Arguments for a single transform call.
///
/// `code`, `filename` and `project_root` are computed by the middleware for
/// every request; `options` carries everything else from configuration.
#[derive(Debug, Clone, Copy)]
pub struct TransformInput<'a> {
    /// Stylesheet source bytes.
    pub code: &'a [u8],
    /// Absolute path of the source file the response was served from.
    pub filename: &'a str,
    /// Configured root directory.
    pub project_root: &'a str,
    /// Whether identifiers should be scoped as a CSS module.
    pub css_modules: bool,
    /// Pass-through options.
    pub options: &'a TransformOptions,
}

/// A CSS transformation engine.
///
/// Returning `Ok(None)` means the engine produced no output; the response
/// body is then emptied.
pub trait CssEngine {
    /// Transforms one stylesheet.
    fn transform(&self, input: TransformInput<'_>) -> Result<Option<Bytes>, TransformError>;
}

/// [`CssEngine`] backed by Lightning CSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightningCss;

impl LightningCss {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }
}

impl CssEngine for LightningCss {
    fn transform(&self, input: TransformInput<'_>) -> Result<Option<Bytes>, TransformError> {
        let filename = input.filename;
        let options = input.options;

        let code = std::str::from_utf8(input.code).map_err(|source| TransformError::Encoding {
            filename: filename.to_owned(),
            source,
        })?;

        let modules = options.css_modules_config();
        let css_modules = if input.css_modules {
            let mut config = Config {
                dashed_idents: modules.dashed_idents,
                ..Config::default()
            };
            if let Some(pattern) = modules.pattern.as_deref() {
                config.pattern = Pattern::parse(pattern).map_err(|e| TransformError::Pattern {
                    pattern: pattern.to_owned(),
                    message: e.to_string(),
                })?;
            }
            Some(config)
        } else {
            None
        };

        let mut flags = ParserFlags::empty();
        if options.custom_media {
            flags |= ParserFlags::CUSTOM_MEDIA;
        }
        if options.deep_selector_combinator {
            flags |= ParserFlags::DEEP_SELECTOR_COMBINATOR;
        }

        let parser_options = ParserOptions {
            filename: filename.to_owned(),
            css_modules,
            error_recovery: options.error_recovery,
            flags,
            ..ParserOptions::default()
        };

        let mut stylesheet =
            StyleSheet::parse(code, parser_options).map_err(|e| TransformError::Parse {
                filename: filename.to_owned(),
                message: e.to_string(),
            })?;

        let targets = resolve_targets(&options.targets)?;

        stylesheet
            .minify(MinifyOptions {
                targets,
                unused_symbols: options.unused_symbols.iter().cloned().collect(),
            })
            .map_err(|e| TransformError::Minify {
                filename: filename.to_owned(),
                message: e.to_string(),
            })?;

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: options.minify,
                project_root: Some(input.project_root),
                targets,
                ..PrinterOptions::default()
            })
            .map_err(|e| TransformError::Print {
                filename: filename.to_owned(),
                message: e.to_string(),
            })?;

        Ok(Some(Bytes::from(result.code)))
    }
}

/// Resolves browserslist queries into Lightning CSS targets.
#[cfg(feature = "browserslist")]
fn resolve_targets(queries: &[String]) -> Result<Targets, TransformError> {
    use lightningcss::targets::Browsers;

    if queries.is_empty() {
        return Ok(Targets::default());
    }

    Browsers::from_browserslist(queries)
        .map(Targets::from)
        .map_err(|e| TransformError::Targets {
            queries: queries.to_vec(),
            message: e.to_string(),
        })
}

#[cfg(not(feature = "browserslist"))]
fn resolve_targets(queries: &[String]) -> Result<Targets, TransformError> {
    if queries.is_empty() {
        return Ok(Targets::default());
    }

    Err(TransformError::Targets {
        queries: queries.to_vec(),
        message: "browserslist support is not enabled".into(),
    })
}
